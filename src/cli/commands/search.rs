//! Search command implementation.

use super::ensure_ready;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::open_course_store;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    course: Option<&str>,
    lesson: Option<u32>,
    settings: Settings,
) -> Result<()> {
    ensure_ready(Operation::Embed)?;

    let store = open_course_store(&settings)?;

    let spinner = Output::spinner("Searching...");
    let results = store.search(query, course, lesson).await;
    spinner.finish_and_clear();

    if let Some(error) = &results.error {
        Output::error(error);
        return Err(anyhow::anyhow!("{}", error));
    }

    if results.is_empty() {
        Output::warning("No results found matching your query.");
        return Ok(());
    }

    Output::success(&format!("Found {} results", results.len()));
    for ((document, meta), distance) in results.iter().zip(&results.distances) {
        let label = match meta.lesson_number {
            Some(n) => format!("{} - Lesson {}", meta.course_title, n),
            None => meta.course_title.clone(),
        };
        Output::search_result(&label, *distance, document);
    }

    Ok(())
}
