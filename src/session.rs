//! Conversation sessions.
//!
//! A session keeps the most recent exchanges of a conversation and renders them
//! as a plain-text history for the system prompt.

use crate::error::{Result, SyllabusError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Default number of exchanges kept per session.
pub const DEFAULT_MAX_HISTORY: usize = 2;

/// Storage for conversation history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a new session and return its ID.
    async fn create_session(&self) -> Result<String>;

    /// Rendered history for a session, or `None` if it has no exchanges.
    async fn get_history(&self, session_id: &str) -> Result<Option<String>>;

    /// Append a question and its answer to a session.
    async fn add_exchange(&self, session_id: &str, question: &str, answer: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Exchange {
    question: String,
    answer: String,
}

/// Session store held in memory for the lifetime of the process.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<Exchange>>>,
    max_history: usize,
}

impl MemorySessionStore {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> SyllabusError {
    SyllabusError::Session(format!("Session lock poisoned: {}", e))
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .write()
            .map_err(lock_error)?
            .insert(id.clone(), Vec::new());
        debug!("Created session {}", id);
        Ok(id)
    }

    async fn get_history(&self, session_id: &str) -> Result<Option<String>> {
        let sessions = self.sessions.read().map_err(lock_error)?;
        let Some(exchanges) = sessions.get(session_id).filter(|e| !e.is_empty()) else {
            return Ok(None);
        };

        let history = exchanges
            .iter()
            .map(|e| format!("User: {}\nAssistant: {}", e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Some(history))
    }

    async fn add_exchange(&self, session_id: &str, question: &str, answer: &str) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(lock_error)?;
        let exchanges = sessions.entry(session_id.to_string()).or_default();
        exchanges.push(Exchange {
            question: question.to_string(),
            answer: answer.to_string(),
        });

        if exchanges.len() > self.max_history {
            let excess = exchanges.len() - self.max_history;
            exchanges.drain(..excess);
        }
        Ok(())
    }
}
