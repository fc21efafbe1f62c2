//! Vector store abstraction for Syllabus.
//!
//! Provides a trait-based interface over named collections of embedded records.
//! Two collections are used: the course catalog (one record per course, keyed by
//! title) and the course content (one record per transcript chunk).

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form record metadata, stored as a JSON object.
pub type Metadata = Map<String, Value>;

/// A named collection inside the vector store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Course titles and their structural metadata.
    Catalog,
    /// Transcript chunks.
    Content,
}

impl Collection {
    /// Name used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Catalog => "course_catalog",
            Collection::Content => "course_content",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record stored in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique ID within the collection.
    pub id: String,
    /// Text that was embedded.
    pub document: String,
    /// Arbitrary metadata used for filtering and display.
    pub metadata: Metadata,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

/// A query hit with its cosine distance (lower is closer).
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: Record,
    pub distance: f32,
}

impl ScoredRecord {
    /// Cosine similarity corresponding to the distance.
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// Conjunction of exact-match conditions on metadata keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter {
    conditions: Vec<(String, Value)>,
}

impl MetadataFilter {
    /// An empty filter matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to equal `value`.
    pub fn equals(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Check whether the metadata satisfies every condition.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.conditions
            .iter()
            .all(|(key, expected)| metadata.get(key) == Some(expected))
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace records by ID.
    async fn upsert_batch(&self, collection: Collection, records: &[Record]) -> Result<usize>;

    /// Nearest-neighbour search, closest first, restricted to records matching `filter`.
    async fn query(
        &self,
        collection: Collection,
        query_embedding: &[f32],
        filter: &MetadataFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>>;

    /// Fetch a record by ID.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>>;

    /// List every record in a collection, in insertion order.
    async fn list(&self, collection: Collection) -> Result<Vec<Record>>;

    /// Number of records in a collection.
    async fn count(&self, collection: Collection) -> Result<usize>;

    /// Remove every record from a collection.
    async fn clear(&self, collection: Collection) -> Result<()>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score and rank candidate records for a query. Ties keep candidate order.
pub(crate) fn rank(
    candidates: impl IntoIterator<Item = Record>,
    query_embedding: &[f32],
    filter: &MetadataFilter,
    limit: usize,
) -> Vec<ScoredRecord> {
    let mut results: Vec<ScoredRecord> = candidates
        .into_iter()
        .filter(|r| filter.matches(&r.metadata))
        .map(|record| {
            let distance = 1.0 - cosine_similarity(query_embedding, &record.embedding);
            ScoredRecord { record, distance }
        })
        .collect();

    results.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}
