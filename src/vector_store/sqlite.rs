//! SQLite-based vector store implementation.
//!
//! Uses SQLite for persistence with cosine similarity computed in Rust. Course
//! catalogs are small enough that a linear scan per query is fine.

use super::{rank, Collection, Metadata, MetadataFilter, Record, ScoredRecord, VectorStore};
use crate::error::{Result, SyllabusError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        document TEXT NOT NULL,
        metadata TEXT NOT NULL,
        embedding BLOB NOT NULL,
        PRIMARY KEY (collection, id)
    );

    CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a SQLite vector store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SyllabusError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, Vec<u8>)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn decode(raw: (String, String, String, Vec<u8>)) -> Result<Record> {
        let (id, document, metadata_json, embedding_bytes) = raw;
        let metadata: Metadata = serde_json::from_str(&metadata_json)?;
        Ok(Record {
            id,
            document,
            metadata,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
        })
    }

    fn load(conn: &Connection, collection: Collection) -> Result<Vec<Record>> {
        let mut stmt = conn.prepare(
            "SELECT id, document, metadata, embedding FROM records
             WHERE collection = ?1 ORDER BY rowid",
        )?;

        let rows = stmt.query_map(params![collection.as_str()], Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(Self::decode(row?)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records), fields(collection = %collection, count = records.len()))]
    async fn upsert_batch(&self, collection: Collection, records: &[Record]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            let metadata_json = serde_json::to_string(&record.metadata)?;
            tx.execute(
                r#"
                INSERT INTO records (collection, id, document, metadata, embedding)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(collection, id) DO UPDATE SET
                    document = excluded.document,
                    metadata = excluded.metadata,
                    embedding = excluded.embedding
                "#,
                params![
                    collection.as_str(),
                    record.id,
                    record.document,
                    metadata_json,
                    Self::embedding_to_bytes(&record.embedding),
                ],
            )?;
        }

        tx.commit()?;
        debug!("Upserted {} records", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, query_embedding, filter), fields(collection = %collection))]
    async fn query(
        &self,
        collection: Collection,
        query_embedding: &[f32],
        filter: &MetadataFilter,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let conn = self.lock()?;
        let candidates = Self::load(&conn, collection)?;
        let results = rank(candidates, query_embedding, filter, limit);

        debug!("Found {} matching records", results.len());
        Ok(results)
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let conn = self.lock()?;
        let raw = conn
            .query_row(
                "SELECT id, document, metadata, embedding FROM records
                 WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                Self::row_to_record,
            )
            .optional()?;

        raw.map(Self::decode).transpose()
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Record>> {
        let conn = self.lock()?;
        Self::load(&conn, collection)
    }

    async fn count(&self, collection: Collection) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            params![collection.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    #[instrument(skip(self))]
    async fn clear(&self, collection: Collection) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM records WHERE collection = ?1",
            params![collection.as_str()],
        )?;
        info!("Cleared {} records from {}", deleted, collection);
        Ok(())
    }
}
