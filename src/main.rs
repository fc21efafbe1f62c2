//! Syllabus CLI entry point.

use anyhow::Result;
use clap::Parser;
use syllabus::cli::{commands, Cli, Commands};
use syllabus::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("syllabus={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let settings = Settings::load_from(cli.config.as_deref())?;

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Ask { questions, session } => {
            commands::run_ask(questions, *session, settings).await?;
        }

        Commands::Chat => {
            commands::run_chat(settings).await?;
        }

        Commands::Courses => {
            commands::run_courses(settings).await?;
        }

        Commands::Outline { course } => {
            commands::run_outline(course, settings).await?;
        }

        Commands::Search { query, course, lesson } => {
            commands::run_search(query, course.as_deref(), *lesson, settings).await?;
        }

        Commands::Load { files, clear } => {
            commands::run_load(files, *clear, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
