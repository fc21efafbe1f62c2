//! Semantic search over course transcripts.

use super::{parse_args, Tool, ToolContext, ToolDefinition};
use crate::course_store::{CourseStore, SearchResults, Source, UNKNOWN_COURSE};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

const TOOL_NAME: &str = "search_course_content";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    lesson_number: Option<u32>,
}

/// Searches transcript chunks, optionally within one course or lesson.
pub struct CourseSearchTool {
    store: Arc<CourseStore>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<CourseStore>) -> Self {
        Self { store }
    }

    async fn format_results(&self, results: &SearchResults, ctx: &mut ToolContext) -> String {
        let mut blocks = Vec::with_capacity(results.len());
        let mut sources = Vec::with_capacity(results.len());

        for (document, meta) in results.iter() {
            let (header, label) = match meta.lesson_number {
                Some(n) => (
                    format!("[{} - Lesson {}]", meta.course_title, n),
                    format!("{} - Lesson {}", meta.course_title, n),
                ),
                None => (format!("[{}]", meta.course_title), meta.course_title.clone()),
            };

            let link = match meta.lesson_number {
                Some(n) if meta.course_title != UNKNOWN_COURSE => {
                    self.store.get_lesson_link(&meta.course_title, n).await
                }
                _ => None,
            };

            blocks.push(format!("{}\n{}", header, document));
            sources.push(Source::new(label).with_link(link));
        }

        ctx.record_sources(TOOL_NAME, sources);
        blocks.join("\n\n")
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOOL_NAME,
            "Search course materials with smart course name matching and lesson filtering",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn execute(&self, input: &Value, ctx: &mut ToolContext) -> String {
        let args: SearchArgs = match parse_args(TOOL_NAME, input) {
            Ok(args) => args,
            Err(message) => return message,
        };
        let course_name = args
            .course_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let results = self
            .store
            .search(&args.query, course_name, args.lesson_number)
            .await;

        if let Some(error) = &results.error {
            return error.clone();
        }

        if results.is_empty() {
            let mut message = String::from("No relevant content found");
            if let Some(name) = course_name {
                message.push_str(&format!(" in course '{}'", name));
            }
            if let Some(n) = args.lesson_number {
                message.push_str(&format!(" in lesson {}", n));
            }
            message.push('.');
            return message;
        }

        debug!("Formatting {} search results", results.len());
        self.format_results(&results, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{course, course_store, FailingVectorStore, KeywordEmbedder};

    async fn mcp_tool() -> CourseSearchTool {
        let mut mcp = course("Intro to MCP", &[(1, "Servers"), (2, "Clients")]);
        mcp.lessons[0].lesson_link = Some("https://example.com/mcp/1".to_string());
        let store = course_store(
            &[mcp],
            &[
                ("Intro to MCP", Some(1), "Servers expose tools to clients."),
                ("Intro to MCP", Some(2), "Clients call server tools."),
            ],
        )
        .await;
        CourseSearchTool::new(Arc::new(store))
    }

    #[test]
    fn test_definition_shape() {
        let store = CourseStore::new(Arc::new(FailingVectorStore), Arc::new(KeywordEmbedder::new()));
        let def = CourseSearchTool::new(Arc::new(store)).definition();

        assert_eq!(def.name, "search_course_content");
        assert_eq!(def.input_schema["required"], json!(["query"]));
        assert_eq!(def.input_schema["properties"]["lesson_number"]["type"], "integer");
    }

    #[tokio::test]
    async fn test_formats_results_and_records_sources() {
        let tool = mcp_tool().await;
        let mut ctx = ToolContext::new();

        let output = tool
            .execute(&json!({"query": "servers", "lesson_number": 1}), &mut ctx)
            .await;

        assert_eq!(output, "[Intro to MCP - Lesson 1]\nServers expose tools to clients.");
        assert_eq!(
            ctx.collect_sources(),
            vec![Source::new("Intro to MCP - Lesson 1")
                .with_link(Some("https://example.com/mcp/1".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_multiple_results_joined_with_blank_line() {
        let tool = mcp_tool().await;
        let mut ctx = ToolContext::new();

        let output = tool
            .execute(&json!({"query": "tools", "course_name": "MCP"}), &mut ctx)
            .await;

        let blocks: Vec<_> = output.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.starts_with("[Intro to MCP - Lesson ")));

        let sources = ctx.collect_sources();
        assert_eq!(sources.len(), 2);
        let lesson_two = sources
            .iter()
            .find(|s| s.text == "Intro to MCP - Lesson 2")
            .unwrap();
        assert_eq!(lesson_two.link, None);
    }

    #[tokio::test]
    async fn test_chunks_without_lesson_have_no_link() {
        let store = course_store(
            &[course("Python Basics", &[(1, "Variables")])],
            &[("Python Basics", None, "An overview of python.")],
        )
        .await;
        let tool = CourseSearchTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"query": "python"}), &mut ctx).await;

        assert_eq!(output, "[Python Basics]\nAn overview of python.");
        assert_eq!(ctx.collect_sources(), vec![Source::new("Python Basics")]);
    }

    #[tokio::test]
    async fn test_empty_results_name_applied_filters() {
        let store = course_store(&[course("Intro to MCP", &[(1, "Servers")])], &[]).await;
        let tool = CourseSearchTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        assert_eq!(
            tool.execute(&json!({"query": "x"}), &mut ctx).await,
            "No relevant content found."
        );
        assert_eq!(
            tool.execute(&json!({"query": "x", "course_name": "MCP", "lesson_number": 5}), &mut ctx)
                .await,
            "No relevant content found in course 'MCP' in lesson 5."
        );
        assert!(ctx.collect_sources().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_course_is_returned_verbatim() {
        let store = course_store(&[], &[]).await;
        let tool = CourseSearchTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool
            .execute(&json!({"query": "x", "course_name": "Nonexistent"}), &mut ctx)
            .await;
        assert_eq!(output, "No course found matching 'Nonexistent'");
    }

    #[tokio::test]
    async fn test_backend_failure_is_returned_in_band() {
        let store = CourseStore::new(Arc::new(FailingVectorStore), Arc::new(KeywordEmbedder::new()));
        let tool = CourseSearchTool::new(Arc::new(store));
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"query": "test"}), &mut ctx).await;
        assert!(output.starts_with("Search error: "));
        assert!(output.contains("Database connection failed"));
        assert!(ctx.collect_sources().is_empty());
    }

    #[tokio::test]
    async fn test_missing_query_is_reported() {
        let tool = mcp_tool().await;
        let mut ctx = ToolContext::new();

        let output = tool.execute(&json!({"course_name": "MCP"}), &mut ctx).await;
        assert!(output.starts_with("Invalid arguments for tool 'search_course_content'"));
    }
}
