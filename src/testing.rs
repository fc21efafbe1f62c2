//! Deterministic test doubles shared by unit tests.

use crate::course_store::{CourseChunk, CourseMetadata, CourseStore, Lesson, Source};
use crate::embedding::Embedder;
use crate::error::{Result, SyllabusError};
use crate::llm::{LanguageModel, ModelRequest, ModelResponse};
use crate::tools::{Tool, ToolContext, ToolDefinition};
use crate::vector_store::{Collection, MemoryVectorStore, MetadataFilter, Record, ScoredRecord, VectorStore};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const KEYWORD_DIMENSIONS: usize = 512;

/// Bag-of-words embedder: each lowercased token bumps one hashed dimension.
///
/// Texts sharing words get positive cosine similarity, texts sharing none get zero.
pub struct KeywordEmbedder;

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; KEYWORD_DIMENSIONS];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[fnv1a(&token.to_lowercase()) % KEYWORD_DIMENSIONS] += 1.0;
        }
        vector
    }
}

fn fnv1a(token: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash as usize
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORD_DIMENSIONS
    }
}

/// Vector store whose every call fails.
pub struct FailingVectorStore;

fn unavailable<T>() -> Result<T> {
    Err(SyllabusError::VectorStore("Database connection failed".to_string()))
}

#[async_trait]
impl VectorStore for FailingVectorStore {
    async fn upsert_batch(&self, _collection: Collection, _records: &[Record]) -> Result<usize> {
        unavailable()
    }

    async fn query(
        &self,
        _collection: Collection,
        _embedding: &[f32],
        _filter: &MetadataFilter,
        _limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        unavailable()
    }

    async fn get(&self, _collection: Collection, _id: &str) -> Result<Option<Record>> {
        unavailable()
    }

    async fn list(&self, _collection: Collection) -> Result<Vec<Record>> {
        unavailable()
    }

    async fn count(&self, _collection: Collection) -> Result<usize> {
        unavailable()
    }

    async fn clear(&self, _collection: Collection) -> Result<()> {
        unavailable()
    }
}

/// Language model that replays canned responses and records each request.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ModelResponse>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model whose first call fails with a transport error.
    pub fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(SyllabusError::Llm(message.to_string()))])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SyllabusError::Llm("no scripted response left".to_string())))
    }
}

/// Tool returning a fixed output, remembering the inputs it was called with.
pub struct RecordingTool {
    name: String,
    output: String,
    sources: Vec<Source>,
    calls: Mutex<Vec<Value>>,
}

impl RecordingTool {
    pub fn new(name: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            output: output.to_string(),
            sources: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Record these sources on every call.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name.clone(),
            "A test tool",
            json!({"type": "object", "properties": {}}),
        )
    }

    async fn execute(&self, input: &Value, ctx: &mut ToolContext) -> String {
        self.calls.lock().unwrap().push(input.clone());
        ctx.record_sources(&self.name, self.sources.clone());
        self.output.clone()
    }
}

/// Course metadata with numbered lessons and no links.
pub fn course(title: &str, lessons: &[(u32, &str)]) -> CourseMetadata {
    CourseMetadata {
        title: title.to_string(),
        course_link: None,
        instructor: None,
        lessons: lessons
            .iter()
            .map(|(number, lesson_title)| Lesson {
                lesson_number: *number,
                lesson_title: lesson_title.to_string(),
                lesson_link: None,
            })
            .collect(),
    }
}

/// An in-memory course store holding the given courses and
/// `(course_title, lesson_number, content)` chunks.
pub async fn course_store(
    courses: &[CourseMetadata],
    chunks: &[(&str, Option<u32>, &str)],
) -> CourseStore {
    let store = CourseStore::new(
        Arc::new(MemoryVectorStore::new()),
        Arc::new(KeywordEmbedder::new()),
    );

    for course in courses {
        store.add_course_metadata(course).await.unwrap();
    }

    let mut titles: Vec<&str> = Vec::new();
    for (title, _, _) in chunks {
        if !titles.contains(title) {
            titles.push(*title);
        }
    }
    for title in titles {
        let course_chunks: Vec<CourseChunk> = chunks
            .iter()
            .filter(|(t, _, _)| *t == title)
            .map(|(_, lesson_number, content)| CourseChunk {
                content: content.to_string(),
                lesson_number: *lesson_number,
            })
            .collect();
        store.add_course_content(title, &course_chunks).await.unwrap();
    }

    store
}
