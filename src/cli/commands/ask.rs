//! Ask command implementation.

use super::{ensure_ready, print_sources};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::RagSystem;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(questions: &[String], session: bool, settings: Settings) -> Result<()> {
    ensure_ready(Operation::Ask)?;

    let system = RagSystem::from_settings(&settings)?;
    let session_id = if session {
        Some(system.create_session().await?)
    } else {
        None
    };

    for question in questions {
        if questions.len() > 1 {
            Output::header(question);
        }

        let spinner = Output::spinner("Thinking...");
        let result = system.query(question, session_id.as_deref()).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                for call in &response.tool_calls {
                    tracing::info!("Tool call: {}", call);
                }
                println!("\n{}\n", response.answer);
                print_sources(&response.sources);
            }
            Err(e) => {
                Output::error(&format!("Failed to generate answer: {}", e));
                return Err(e.into());
            }
        }
    }

    Ok(())
}
