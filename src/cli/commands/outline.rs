//! Outline command implementation.

use super::ensure_ready;
use crate::cli::preflight::Operation;
use crate::config::Settings;
use crate::rag::open_course_store;
use crate::tools::{CourseOutlineTool, Tool, ToolContext};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

/// Run the outline command.
pub async fn run_outline(course: &str, settings: Settings) -> Result<()> {
    ensure_ready(Operation::Embed)?;

    let store = Arc::new(open_course_store(&settings)?);
    let tool = CourseOutlineTool::new(store);

    let outline = tool
        .execute(&json!({ "course_title": course }), &mut ToolContext::new())
        .await;
    println!("\n{}\n", outline);

    Ok(())
}
