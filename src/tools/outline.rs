//! Course outline lookup.

use super::{parse_args, Tool, ToolContext, ToolDefinition};
use crate::course_store::{CourseMetadata, CourseStore};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

const TOOL_NAME: &str = "get_course_outline";

#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_title: String,
}

/// Returns a course's title, link and ordered lesson list.
pub struct CourseOutlineTool {
    store: Arc<CourseStore>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<CourseStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOOL_NAME,
            "Get the complete outline of a course: title, course link and the numbered list of lessons",
            json!({
                "type": "object",
                "properties": {
                    "course_title": {
                        "type": "string",
                        "description": "Course title to get the outline for (partial matches work, e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_title"]
            }),
        )
    }

    async fn execute(&self, input: &Value, _ctx: &mut ToolContext) -> String {
        let args: OutlineArgs = match parse_args(TOOL_NAME, input) {
            Ok(args) => args,
            Err(message) => return message,
        };

        let title = match self.store.resolve_course_name(&args.course_title).await {
            Ok(Some(title)) => title,
            Ok(None) => return format!("No course found matching '{}'", args.course_title),
            Err(e) => {
                warn!("Outline lookup failed: {}", e);
                return format!("Error retrieving course outline: {}", e);
            }
        };

        let courses = match self.store.get_all_courses_metadata().await {
            Ok(courses) => courses,
            Err(e) => {
                warn!("Outline lookup failed: {}", e);
                return format!("Error retrieving course outline: {}", e);
            }
        };

        match courses.iter().find(|c| c.title == title) {
            Some(course) => format_outline(course),
            None => format!("Course '{}' not found in metadata", title),
        }
    }
}

fn format_outline(course: &CourseMetadata) -> String {
    let mut lines = vec![format!("**{}**", course.title)];

    if let Some(link) = course.course_link.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("Course Link: {}", link));
    }

    if course.lessons.is_empty() {
        lines.push("\nNo lessons found for this course.".to_string());
    } else {
        let mut lessons: Vec<_> = course.lessons.iter().collect();
        lessons.sort_by_key(|l| l.lesson_number);

        lines.push("\n**Lessons:**".to_string());
        lines.extend(
            lessons
                .into_iter()
                .map(|l| format!("{}. {}", l.lesson_number, l.lesson_title)),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::testing::{course, course_store, FailingVectorStore, KeywordEmbedder};
    use crate::vector_store::{Collection, Metadata, MetadataFilter, Record, ScoredRecord, VectorStore};

    /// Catalog whose title index resolves a course that has no metadata listing.
    struct CatalogWithoutMetadata;

    #[async_trait]
    impl VectorStore for CatalogWithoutMetadata {
        async fn upsert_batch(&self, _collection: Collection, _records: &[Record]) -> Result<usize> {
            Ok(0)
        }

        async fn query(
            &self,
            _collection: Collection,
            _embedding: &[f32],
            _filter: &MetadataFilter,
            _limit: usize,
        ) -> Result<Vec<ScoredRecord>> {
            Ok(vec![ScoredRecord {
                record: Record {
                    id: "Ghost Course".to_string(),
                    document: "Ghost Course".to_string(),
                    metadata: Metadata::new(),
                    embedding: vec![1.0],
                },
                distance: 0.0,
            }])
        }

        async fn get(&self, _collection: Collection, _id: &str) -> Result<Option<Record>> {
            Ok(None)
        }

        async fn list(&self, _collection: Collection) -> Result<Vec<Record>> {
            Ok(vec![])
        }

        async fn count(&self, _collection: Collection) -> Result<usize> {
            Ok(0)
        }

        async fn clear(&self, _collection: Collection) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_sorts_lessons_stably() {
        let mut mcp = course("Intro to MCP", &[(2, "Clients"), (0, "Welcome"), (2, "Clients, again")]);
        mcp.course_link = Some("https://example.com/mcp".to_string());

        assert_eq!(
            format_outline(&mcp),
            "**Intro to MCP**\nCourse Link: https://example.com/mcp\n\n**Lessons:**\n\
             0. Welcome\n2. Clients\n2. Clients, again"
        );
    }

    #[test]
    fn test_format_orders_out_of_order_lessons() {
        let output = format_outline(&course("Letters", &[(2, "B"), (1, "A")]));
        let a = output.find("1. A").unwrap();
        let b = output.find("2. B").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_format_without_link_or_lessons() {
        assert_eq!(
            format_outline(&course("Empty Course", &[])),
            "**Empty Course**\n\nNo lessons found for this course."
        );
    }

    #[tokio::test]
    async fn test_resolves_partial_title() {
        let store = course_store(
            &[
                course("Intro to MCP", &[(1, "Servers"), (0, "Welcome")]),
                course("Python Basics", &[(1, "Variables")]),
            ],
            &[],
        )
        .await;
        let tool = CourseOutlineTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"course_title": "mcp"}), &mut ctx).await;

        assert_eq!(output, "**Intro to MCP**\n\n**Lessons:**\n0. Welcome\n1. Servers");
        assert!(ctx.collect_sources().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_course() {
        let store = course_store(&[], &[]).await;
        let tool = CourseOutlineTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"course_title": "Gardening"}), &mut ctx).await;
        assert_eq!(output, "No course found matching 'Gardening'");
    }

    #[tokio::test]
    async fn test_resolved_course_missing_from_metadata() {
        let store = CourseStore::new(Arc::new(CatalogWithoutMetadata), Arc::new(KeywordEmbedder::new()));
        let tool = CourseOutlineTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"course_title": "Ghost"}), &mut ctx).await;
        assert_eq!(output, "Course 'Ghost Course' not found in metadata");
        assert!(ctx.collect_sources().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_is_in_band() {
        let store = CourseStore::new(Arc::new(FailingVectorStore), Arc::new(KeywordEmbedder::new()));
        let tool = CourseOutlineTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"course_title": "MCP"}), &mut ctx).await;
        assert!(output.starts_with("Error retrieving course outline: "));
        assert!(output.contains("Database connection failed"));
    }

    #[test]
    fn test_definition_shape() {
        let store = CourseStore::new(Arc::new(FailingVectorStore), Arc::new(KeywordEmbedder::new()));
        let def = CourseOutlineTool::new(Arc::new(store)).definition();

        assert_eq!(def.name, "get_course_outline");
        assert_eq!(def.input_schema["required"], json!(["course_title"]));
    }
}
