//! Course catalog data types.

use serde::{Deserialize, Serialize};

/// A single lesson inside a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_number: u32,
    pub lesson_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_link: Option<String>,
}

/// Structural metadata for one ingested course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl CourseMetadata {
    /// Look up a lesson by number.
    pub fn lesson(&self, lesson_number: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.lesson_number == lesson_number)
    }
}

/// Metadata attached to each content chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default = "unknown_course")]
    pub course_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

pub(crate) const UNKNOWN_COURSE: &str = "unknown";

fn unknown_course() -> String {
    UNKNOWN_COURSE.to_string()
}

/// A pre-chunked piece of transcript ready for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseChunk {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
}

/// A course as loaded from disk: its catalog entry plus transcript chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDocument {
    #[serde(flatten)]
    pub metadata: CourseMetadata,
    #[serde(default)]
    pub chunks: Vec<CourseChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_document_from_json() {
        let doc: CourseDocument = serde_json::from_str(
            r#"{
                "title": "Intro to MCP",
                "course_link": "https://example.com/mcp",
                "lessons": [
                    {"lesson_number": 0, "lesson_title": "Welcome", "lesson_link": "https://example.com/mcp/0"},
                    {"lesson_number": 1, "lesson_title": "Servers"}
                ],
                "chunks": [
                    {"lesson_number": 0, "content": "Welcome to the course."},
                    {"content": "Untagged chunk."}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.metadata.title, "Intro to MCP");
        assert_eq!(doc.metadata.instructor, None);
        assert_eq!(doc.metadata.lessons.len(), 2);
        assert_eq!(
            doc.metadata.lesson(0).and_then(|l| l.lesson_link.as_deref()),
            Some("https://example.com/mcp/0")
        );
        assert!(doc.metadata.lesson(7).is_none());
        assert_eq!(doc.chunks[1].lesson_number, None);
    }

    #[test]
    fn test_chunk_metadata_defaults_course_title() {
        let meta: ChunkMetadata = serde_json::from_str(r#"{"lesson_number": 3}"#).unwrap();
        assert_eq!(meta.course_title, "unknown");
        assert_eq!(meta.lesson_number, Some(3));
    }
}
