//! Course-aware adapter over the vector store.
//!
//! Wraps the catalog and content collections and exposes semantic search with
//! course/lesson filtering, plus fuzzy course-name resolution by embedding
//! similarity.

mod loader;
mod models;
mod results;

pub use loader::{read_course_document, LoadSummary};
pub use models::{ChunkMetadata, CourseChunk, CourseDocument, CourseMetadata, Lesson};
pub use results::{SearchResults, Source};
pub(crate) use models::UNKNOWN_COURSE;

use crate::embedding::Embedder;
use crate::error::{Result, SyllabusError};
use crate::vector_store::{Collection, Metadata, MetadataFilter, Record, VectorStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Default number of content chunks returned by a search.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Course catalog and transcript search over a [`VectorStore`].
pub struct CourseStore {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    max_results: usize,
    min_course_similarity: Option<f32>,
}

impl CourseStore {
    /// Create a new course store.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            max_results: DEFAULT_MAX_RESULTS,
            min_course_similarity: None,
        }
    }

    /// Set the maximum number of chunks returned by a search.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Reject course-name matches whose cosine similarity falls below `threshold`.
    ///
    /// With no threshold the nearest title always wins.
    pub fn with_min_course_similarity(mut self, threshold: Option<f32>) -> Self {
        self.min_course_similarity = threshold;
        self
    }

    /// Search course content, optionally restricted to a course and/or lesson.
    ///
    /// Failures are reported through [`SearchResults::error`], never as `Err`.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        let course_title = match course_name {
            Some(name) => match self.resolve_course_name(name).await {
                Ok(Some(title)) => Some(title),
                Ok(None) => return SearchResults::from_error(format!("No course found matching '{}'", name)),
                Err(e) => {
                    warn!("Course resolution failed: {}", e);
                    return SearchResults::from_error(format!("Search error: {}", e));
                }
            },
            None => None,
        };

        match self
            .search_content(query, course_title.as_deref(), lesson_number)
            .await
        {
            Ok(results) => {
                debug!("Search returned {} chunks", results.len());
                results
            }
            Err(e) => {
                warn!("Content search failed: {}", e);
                SearchResults::from_error(format!("Search error: {}", e))
            }
        }
    }

    async fn search_content(
        &self,
        query: &str,
        course_title: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults> {
        let mut filter = MetadataFilter::new();
        if let Some(title) = course_title {
            filter = filter.equals("course_title", title);
        }
        if let Some(n) = lesson_number {
            filter = filter.equals("lesson_number", n);
        }

        let embedding = self.embedder.embed(query).await?;
        let hits = self
            .store
            .query(Collection::Content, &embedding, &filter, self.max_results)
            .await?;

        let mut documents = Vec::with_capacity(hits.len());
        let mut metadata = Vec::with_capacity(hits.len());
        let mut distances = Vec::with_capacity(hits.len());

        for hit in hits {
            metadata.push(serde_json::from_value(Value::Object(hit.record.metadata))?);
            documents.push(hit.record.document);
            distances.push(hit.distance);
        }

        Ok(SearchResults::new(documents, metadata, distances))
    }

    /// Resolve a partial or fuzzy course name to a stored course title.
    ///
    /// Returns the title whose embedding is nearest to the input. `None` when the
    /// catalog is empty or the best match is under the similarity threshold.
    #[instrument(skip(self))]
    pub async fn resolve_course_name(&self, course_name: &str) -> Result<Option<String>> {
        let embedding = self.embedder.embed(course_name).await?;
        let best = self
            .store
            .query(Collection::Catalog, &embedding, &MetadataFilter::new(), 1)
            .await?
            .into_iter()
            .next();

        let Some(best) = best else {
            debug!("Catalog is empty, nothing to resolve against");
            return Ok(None);
        };

        if let Some(threshold) = self.min_course_similarity {
            if best.similarity() < threshold {
                debug!(
                    "Best match '{}' scored {:.3}, below threshold {:.3}",
                    best.record.id,
                    best.similarity(),
                    threshold
                );
                return Ok(None);
            }
        }

        debug!("Resolved '{}' to '{}'", course_name, best.record.id);
        Ok(Some(best.record.id))
    }

    /// Look up the link for a lesson by exact course title.
    pub async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        match self.get_course_metadata(course_title).await {
            Ok(course) => course?.lesson(lesson_number)?.lesson_link.clone(),
            Err(e) => {
                warn!("Failed to read lesson link for '{}': {}", course_title, e);
                None
            }
        }
    }

    /// Fetch one course's metadata by exact title.
    pub async fn get_course_metadata(&self, course_title: &str) -> Result<Option<CourseMetadata>> {
        self.store
            .get(Collection::Catalog, course_title)
            .await?
            .map(|record| decode_course(record.metadata))
            .transpose()
    }

    /// Metadata for every ingested course.
    pub async fn get_all_courses_metadata(&self) -> Result<Vec<CourseMetadata>> {
        self.store
            .list(Collection::Catalog)
            .await?
            .into_iter()
            .map(|record| decode_course(record.metadata))
            .collect()
    }

    /// Titles of every ingested course.
    pub async fn get_existing_course_titles(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list(Collection::Catalog)
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect())
    }

    /// Number of ingested courses.
    pub async fn get_course_count(&self) -> Result<usize> {
        self.store.count(Collection::Catalog).await
    }

    /// Add (or replace) a course in the catalog. The title is what gets embedded.
    #[instrument(skip(self, course), fields(title = %course.title))]
    pub async fn add_course_metadata(&self, course: &CourseMetadata) -> Result<()> {
        if course.title.trim().is_empty() {
            return Err(SyllabusError::InvalidInput("Course title is empty".to_string()));
        }

        let embedding = self.embedder.embed(&course.title).await?;
        let metadata = match serde_json::to_value(course)? {
            Value::Object(map) => map,
            _ => Metadata::new(),
        };

        self.store
            .upsert_batch(
                Collection::Catalog,
                &[Record {
                    id: course.title.clone(),
                    document: course.title.clone(),
                    metadata,
                    embedding,
                }],
            )
            .await?;

        info!("Added course '{}' with {} lessons", course.title, course.lessons.len());
        Ok(())
    }

    /// Embed and index transcript chunks for a course.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn add_course_content(&self, course_title: &str, chunks: &[CourseChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let records: Vec<Record> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (chunk, embedding))| {
                let meta = ChunkMetadata {
                    course_title: course_title.to_string(),
                    lesson_number: chunk.lesson_number,
                    chunk_index: Some(index),
                };
                let metadata = match serde_json::to_value(&meta) {
                    Ok(Value::Object(map)) => map,
                    _ => Metadata::new(),
                };
                Record {
                    id: format!("{}_{}", course_title, index),
                    document: chunk.content.clone(),
                    metadata,
                    embedding,
                }
            })
            .collect();

        let added = self.store.upsert_batch(Collection::Content, &records).await?;
        info!("Indexed {} chunks for '{}'", added, course_title);
        Ok(added)
    }

    /// Remove every course and chunk.
    pub async fn clear_all_data(&self) -> Result<()> {
        self.store.clear(Collection::Catalog).await?;
        self.store.clear(Collection::Content).await?;
        info!("Cleared course catalog and content");
        Ok(())
    }
}

fn decode_course(metadata: Metadata) -> Result<CourseMetadata> {
    Ok(serde_json::from_value(Value::Object(metadata))?)
}
