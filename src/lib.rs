//! Syllabus - question answering over course transcripts
//!
//! A language model answers questions about a catalog of courses, calling two
//! lookup tools backed by a vector index: semantic transcript search and course
//! outline retrieval.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `course_store` - Course catalog, content search and course-name resolution
//! - `tools` - Tool trait, registry and the course tools
//! - `llm` - Language model boundary (Anthropic Messages API)
//! - `agent` - Answer generation with one round of tool use
//! - `session` - Conversation history
//! - `rag` - Query pipeline tying it all together
//!
//! # Example
//!
//! ```rust,no_run
//! use syllabus::config::Settings;
//! use syllabus::rag::RagSystem;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let system = RagSystem::from_settings(&settings)?;
//!
//!     let response = system.query("What is covered in lesson 2 of the MCP course?", None).await?;
//!     println!("{}", response.answer);
//!     for source in &response.sources {
//!         println!("  {}", source);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod course_store;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod rag;
pub mod session;
pub mod tools;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, SyllabusError};
