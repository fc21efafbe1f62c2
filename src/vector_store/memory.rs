//! In-memory vector store implementation.
//!
//! Useful for testing and small catalogs.

use super::{rank, Collection, MetadataFilter, Record, ScoredRecord, VectorStore};
use crate::error::{Result, SyllabusError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store. Records keep their insertion order.
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Collection, Vec<Record>>>> {
        self.collections
            .read()
            .map_err(|e| SyllabusError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Collection, Vec<Record>>>> {
        self.collections
            .write()
            .map_err(|e| SyllabusError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, collection: Collection, records: &[Record]) -> Result<usize> {
        let mut collections = self.write()?;
        let stored = collections.entry(collection).or_default();

        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => stored.push(record.clone()),
            }
        }

        Ok(records.len())
    }

    async fn query(
        &self,
        collection: Collection,
        query_embedding: &[f32],
        filter: &MetadataFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let collections = self.read()?;
        let candidates = collections
            .get(&collection)
            .map(|records| records.to_vec())
            .unwrap_or_default();

        Ok(rank(candidates, query_embedding, filter, limit))
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Record>> {
        let collections = self.read()?;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn count(&self, collection: Collection) -> Result<usize> {
        let collections = self.read()?;
        Ok(collections.get(&collection).map_or(0, Vec::len))
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        let mut collections = self.write()?;
        collections.remove(&collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::Metadata;
    use serde_json::json;

    fn record(id: &str, course: &str, embedding: Vec<f32>) -> Record {
        let mut metadata = Metadata::new();
        metadata.insert("course_title".into(), json!(course));
        Record {
            id: id.to_string(),
            document: format!("content {}", id),
            metadata,
            embedding,
        }
    }

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        store
            .upsert_batch(
                Collection::Content,
                &[
                    record("a", "Course A", vec![1.0, 0.0, 0.0]),
                    record("b", "Course B", vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        assert_eq!(store.count(Collection::Content).await.unwrap(), 2);
        assert_eq!(store.count(Collection::Catalog).await.unwrap(), 0);

        let results = store
            .query(Collection::Content, &[1.0, 0.0, 0.0], &MetadataFilter::new(), 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.id, "a");
        assert!(results[0].distance < results[1].distance);

        let filtered = store
            .query(
                Collection::Content,
                &[1.0, 0.0, 0.0],
                &MetadataFilter::new().equals("course_title", "Course B"),
                10,
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].record.id, "b");
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = MemoryVectorStore::new();
        store
            .upsert_batch(
                Collection::Catalog,
                &[record("x", "First", vec![1.0]), record("y", "Second", vec![1.0])],
            )
            .await
            .unwrap();
        store
            .upsert_batch(Collection::Catalog, &[record("x", "Replaced", vec![1.0])])
            .await
            .unwrap();

        let listed = store.list(Collection::Catalog).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].metadata["course_title"], json!("Replaced"));

        store.clear(Collection::Catalog).await.unwrap();
        assert!(store.get(Collection::Catalog, "x").await.unwrap().is_none());
    }
}
