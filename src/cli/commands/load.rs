//! Load command implementation.

use super::ensure_ready;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::course_store::{read_course_document, LoadSummary};
use crate::rag::open_course_store;
use anyhow::Result;
use std::path::PathBuf;

/// Run the load command.
pub async fn run_load(files: &[PathBuf], clear: bool, settings: Settings) -> Result<()> {
    ensure_ready(Operation::Embed)?;

    // Parse everything up front so a bad file fails before anything is embedded.
    for file in files {
        read_course_document(file)?;
    }

    let store = open_course_store(&settings)?;
    if clear {
        store.clear_all_data().await?;
        Output::info("Cleared existing courses.");
    }

    let pb = Output::progress_bar(files.len() as u64, "Loading courses");
    let mut total = LoadSummary::default();
    for file in files {
        pb.set_message(file.display().to_string());
        let summary = store.load_courses(std::slice::from_ref(file), false).await?;
        total.courses_added += summary.courses_added;
        total.chunks_added += summary.chunks_added;
        total.skipped.extend(summary.skipped);
        pb.inc(1);
    }
    pb.finish_and_clear();

    for title in &total.skipped {
        Output::warning(&format!("Skipped '{}': already loaded", title));
    }
    Output::success(&format!(
        "Loaded {} courses ({} chunks)",
        total.courses_added, total.chunks_added
    ));

    Ok(())
}
