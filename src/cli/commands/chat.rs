//! Interactive chat command.

use super::{ensure_ready, print_sources};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::RagSystem;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> Result<()> {
    ensure_ready(Operation::Ask)?;

    let system = RagSystem::from_settings(&settings)?;
    let mut session_id = system.create_session().await?;

    println!("\n{}", style("Syllabus Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about your courses, or 'exit' to quit. Use 'clear' to start a new conversation.")
            .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session_id = system.create_session().await?;
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = system.query(input, Some(&session_id)).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                for call in &response.tool_calls {
                    println!("{}", style(format!("  [{}]", call.name)).dim());
                }
                println!("\n{} {}\n", style("Syllabus:").cyan().bold(), response.answer);
                print_sources(&response.sources);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
