//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod courses;
mod load;
mod outline;
mod search;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use courses::run_courses;
pub use load::run_load;
pub use outline::run_outline;
pub use search::run_search;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::course_store::Source;

/// Run pre-flight checks, printing what is missing.
fn ensure_ready(operation: Operation) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    Ok(())
}

fn print_sources(sources: &[Source]) {
    if sources.is_empty() {
        return;
    }
    Output::header("Sources");
    for source in sources {
        Output::source(source);
    }
    println!();
}
