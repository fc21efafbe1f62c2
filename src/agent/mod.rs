//! Tool-augmented answer generation.
//!
//! The [`Generator`] asks the language model to answer a query, letting it call
//! the registered course tools for at most one round before producing the final
//! answer.

mod runner;

pub use runner::{Generation, Generator, ToolCallRecord, SYSTEM_PROMPT};
