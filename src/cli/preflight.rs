//! Pre-flight checks before operations that call external APIs.
//!
//! Validates that required API keys are present before starting work that
//! would otherwise fail midway.

use crate::error::{Result, SyllabusError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering questions needs embeddings and the language model.
    Ask,
    /// Search, outline lookup and loading need embeddings.
    Embed,
    /// Listing courses reads the local store only.
    Local,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_api_key("OPENAI_API_KEY", "sk-...")?;
            check_api_key("ANTHROPIC_API_KEY", "sk-ant-...")?;
        }
        Operation::Embed => {
            check_api_key("OPENAI_API_KEY", "sk-...")?;
        }
        Operation::Local => {}
    }
    Ok(())
}

fn check_api_key(var: &str, example: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(SyllabusError::Config(format!(
            "{} is empty. Set it with: export {}='{}'",
            var, var, example
        ))),
        Err(_) => Err(SyllabusError::Config(format!(
            "{} not set. Set it with: export {}='{}'",
            var, var, example
        ))),
    }
}
