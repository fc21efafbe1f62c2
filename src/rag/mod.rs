//! Question answering over the course catalog.
//!
//! [`RagSystem`] wires the course store, the tools and the generator together and
//! tracks conversation sessions.

mod engine;

pub use engine::{open_course_store, RagSystem};

use crate::agent::ToolCallRecord;
use crate::course_store::Source;
use serde::Serialize;

/// Answer to a user query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    /// The generated answer.
    pub answer: String,
    /// Sources the tools retrieved while answering.
    pub sources: Vec<Source>,
    /// Tool calls made by the model.
    #[serde(skip)]
    pub tool_calls: Vec<ToolCallRecord>,
}

/// Catalog statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}
