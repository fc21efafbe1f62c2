//! Search results and source provenance.

use super::models::ChunkMetadata;
use serde::{Deserialize, Serialize};

/// Outcome of a content search.
///
/// `documents`, `metadata` and `distances` are parallel. When `error` is set all
/// three are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f32>,
    pub error: Option<String>,
}

impl SearchResults {
    /// Build results from parallel vectors.
    pub fn new(documents: Vec<String>, metadata: Vec<ChunkMetadata>, distances: Vec<f32>) -> Self {
        debug_assert!(documents.len() == metadata.len() && metadata.len() == distances.len());
        Self {
            documents,
            metadata,
            distances,
            error: None,
        }
    }

    /// Empty results carrying an error message.
    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Iterate over `(document, metadata)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ChunkMetadata)> {
        self.documents.iter().zip(self.metadata.iter())
    }
}

/// Provenance for one retrieved chunk, shown alongside the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Source {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.link {
            Some(link) => write!(f, "{} ({})", self.text, link),
            None => f.write_str(&self.text),
        }
    }
}
