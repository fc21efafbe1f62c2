//! Loading pre-chunked course documents into the store.

use super::{CourseDocument, CourseStore};
use crate::error::{Result, SyllabusError};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of loading course files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    /// Courses newly added to the catalog.
    pub courses_added: usize,
    /// Transcript chunks indexed for those courses.
    pub chunks_added: usize,
    /// Titles skipped because they were already loaded.
    pub skipped: Vec<String>,
}

impl CourseStore {
    /// Add a course's catalog entry and index its chunks.
    ///
    /// Returns the number of chunks indexed.
    pub async fn add_course(&self, document: &CourseDocument) -> Result<usize> {
        self.add_course_metadata(&document.metadata).await?;
        self.add_course_content(&document.metadata.title, &document.chunks)
            .await
    }

    /// Load course documents (JSON) from disk, skipping titles already present.
    pub async fn load_courses<P: AsRef<Path>>(&self, paths: &[P], clear_existing: bool) -> Result<LoadSummary> {
        if clear_existing {
            info!("Clearing existing course data");
            self.clear_all_data().await?;
        }

        let mut existing = self.get_existing_course_titles().await?;
        let mut summary = LoadSummary::default();

        for path in paths {
            let document = read_course_document(path.as_ref())?;
            let title = document.metadata.title.clone();

            if existing.contains(&title) {
                debug!("Course '{}' already loaded, skipping", title);
                summary.skipped.push(title);
                continue;
            }

            summary.chunks_added += self.add_course(&document).await?;
            summary.courses_added += 1;
            existing.push(title);
        }

        Ok(summary)
    }
}

/// Parse a course document from a JSON file.
pub fn read_course_document(path: &Path) -> Result<CourseDocument> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        SyllabusError::InvalidInput(format!("{} is not a course document: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course_store::CourseChunk;
    use crate::testing::{course, course_store};

    fn mcp_document() -> CourseDocument {
        CourseDocument {
            metadata: course("Intro to MCP", &[(1, "Servers"), (2, "Clients")]),
            chunks: vec![
                CourseChunk {
                    content: "Servers expose tools.".to_string(),
                    lesson_number: Some(1),
                },
                CourseChunk {
                    content: "Clients discover tools.".to_string(),
                    lesson_number: Some(2),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_add_course_indexes_chunks() {
        let store = course_store(&[], &[]).await;

        assert_eq!(store.add_course(&mcp_document()).await.unwrap(), 2);
        assert_eq!(store.get_course_count().await.unwrap(), 1);

        let results = store.search("clients", Some("MCP"), Some(2)).await;
        assert_eq!(results.documents, vec!["Clients discover tools.".to_string()]);
        assert_eq!(results.metadata[0].chunk_index, Some(1));
    }

    #[tokio::test]
    async fn test_load_courses_skips_existing_titles() {
        let store = course_store(&[], &[]).await;
        store.add_course(&mcp_document()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();

        let existing = dir.path().join("mcp.json");
        std::fs::write(&existing, serde_json::to_string(&mcp_document()).unwrap()).unwrap();

        let new_course = dir.path().join("python.json");
        std::fs::write(
            &new_course,
            r#"{"title": "Python Basics", "lessons": [], "chunks": [{"content": "print hello"}]}"#,
        )
        .unwrap();

        let summary = store.load_courses(&[&existing, &new_course], false).await.unwrap();
        assert_eq!(summary.courses_added, 1);
        assert_eq!(summary.chunks_added, 1);
        assert_eq!(summary.skipped, vec!["Intro to MCP".to_string()]);

        let summary = store.load_courses(&[&existing], true).await.unwrap();
        assert_eq!(summary.courses_added, 1);
        assert_eq!(summary.chunks_added, 2);
        assert_eq!(store.get_course_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_file() {
        let store = course_store(&[], &[]).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"lessons": []}"#).unwrap();

        let err = store.load_courses(&[&path], false).await.unwrap_err();
        assert!(matches!(err, SyllabusError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let store = course_store(&[], &[]).await;
        let err = store
            .load_courses(&[Path::new("/nonexistent/course.json")], false)
            .await
            .unwrap_err();
        assert!(matches!(err, SyllabusError::Io(_)));
    }
}
