//! Query pipeline: session history, tool-augmented generation, source harvesting.

use super::{CourseAnalytics, QueryResponse};
use crate::agent::Generator;
use crate::config::{Settings, VectorStoreProvider};
use crate::course_store::{CourseDocument, CourseStore};
use crate::embedding::OpenAIEmbedder;
use crate::error::Result;
use crate::llm::{AnthropicClient, AnthropicConfig, LanguageModel};
use crate::session::{MemorySessionStore, SessionStore};
use crate::tools::{CourseOutlineTool, CourseSearchTool, ToolContext, ToolRegistry};
use crate::vector_store::{MemoryVectorStore, SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The question-answering system.
///
/// All per-query state lives in a [`ToolContext`] created inside [`RagSystem::query`],
/// so one instance can serve concurrent queries behind an `Arc`.
pub struct RagSystem {
    store: Arc<CourseStore>,
    generator: Generator,
    tools: ToolRegistry,
    sessions: Arc<dyn SessionStore>,
}

impl RagSystem {
    /// Create a system from its parts and register the course tools.
    pub fn new(
        store: Arc<CourseStore>,
        model: Arc<dyn LanguageModel>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CourseSearchTool::new(store.clone())))?;
        tools.register(Arc::new(CourseOutlineTool::new(store.clone())))?;

        Ok(Self {
            store,
            generator: Generator::new(model),
            tools,
            sessions,
        })
    }

    /// Build the system from settings: OpenAI embeddings, Anthropic answers and the
    /// configured vector store.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store = open_course_store(settings)?;

        let model = AnthropicClient::new(AnthropicConfig {
            model: settings.llm.model.clone(),
            max_tokens: settings.llm.max_tokens,
            temperature: settings.llm.temperature,
            timeout: settings.llm.timeout(),
        })?;

        let sessions = MemorySessionStore::new(settings.session.max_history);

        Self::new(Arc::new(store), Arc::new(model), Arc::new(sessions))
    }

    /// The registered tools.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Start a new conversation.
    pub async fn create_session(&self) -> Result<String> {
        self.sessions.create_session().await
    }

    /// Answer a query, optionally within a conversation session.
    #[instrument(skip(self), fields(session = session_id.unwrap_or("-")))]
    pub async fn query(&self, query: &str, session_id: Option<&str>) -> Result<QueryResponse> {
        let prompt = format!("Answer this question about course materials: {}", query);

        let history = match session_id {
            Some(id) => self.sessions.get_history(id).await?,
            None => None,
        };

        let mut ctx = ToolContext::new();
        let generation = self
            .generator
            .generate(&prompt, history.as_deref(), Some(&self.tools), &mut ctx)
            .await?;

        let sources = ctx.collect_sources();
        ctx.clear_sources();

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, query, &generation.answer).await?;
        }

        info!(
            "Answered with {} tool calls and {} sources",
            generation.tool_calls.len(),
            sources.len()
        );

        Ok(QueryResponse {
            answer: generation.answer,
            sources,
            tool_calls: generation.tool_calls,
        })
    }

    /// Number of courses and their titles.
    pub async fn get_course_analytics(&self) -> Result<CourseAnalytics> {
        Ok(CourseAnalytics {
            total_courses: self.store.get_course_count().await?,
            course_titles: self.store.get_existing_course_titles().await?,
        })
    }

    /// Add a pre-chunked course to the catalog and index its content.
    ///
    /// Returns the number of chunks indexed.
    pub async fn add_course(&self, document: &CourseDocument) -> Result<usize> {
        self.store.add_course(document).await
    }

    /// Remove every course and chunk.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear_all_data().await
    }
}

/// Open the configured vector store behind a course store with OpenAI embeddings.
pub fn open_course_store(settings: &Settings) -> Result<CourseStore> {
    let vector_store: Arc<dyn VectorStore> = match settings.vector_store.provider {
        VectorStoreProvider::Sqlite => {
            let path = settings.sqlite_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            debug!("Opening vector store at {}", path.display());
            Arc::new(SqliteVectorStore::new(&path)?)
        }
        VectorStoreProvider::Memory => Arc::new(MemoryVectorStore::new()),
    };

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
        settings.embedding.timeout(),
    )?);

    Ok(CourseStore::new(vector_store, embedder)
        .with_max_results(settings.search.max_results)
        .with_min_course_similarity(settings.search.min_course_similarity))
}
