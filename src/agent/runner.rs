//! Generator with a single round of tool calling.

use crate::error::Result;
use crate::llm::{
    ContentBlock, LanguageModel, Message, ModelRequest, ModelResponse, StopReason, ToolChoice,
};
use crate::tools::{ToolContext, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default system prompt for course questions.
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant specialized in course materials and educational content, with access to tools for course information.

Tool usage:
- Use 'get_course_outline' for questions about a course's structure: its title, course link, or the list of lessons with their numbers and titles
- Use 'search_course_content' for questions about specific course content or detailed educational material
- Use at most one round of tool calls per query
- Synthesize tool results into accurate, fact-based responses
- If a tool yields no results, say so clearly without offering alternatives

Response protocol:
- General knowledge questions: answer from existing knowledge without using tools
- Course-specific questions: use the appropriate tool first, then answer
- When returning an outline, include the course title, course link, and every lesson number and title
- No meta-commentary: do not explain your reasoning or search process, and do not mention the tool results

All responses must be:
1. Brief and focused on the question
2. Educational, maintaining instructional value
3. Clear, using accessible language
4. Supported by examples when they aid understanding

Provide only the direct answer to what was asked."#;

/// Answers queries with a language model and the course tools.
pub struct Generator {
    model: Arc<dyn LanguageModel>,
    system_prompt: String,
}

impl Generator {
    /// Create a generator using the default system prompt.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Generate an answer to `query`.
    ///
    /// `history` is a rendered summary of earlier exchanges, appended to the system
    /// prompt. When `tools` is given the model may call them once; their output
    /// is fed back in a follow-up call that offers no tools. Tool failures are
    /// seen by the model as text. Only model errors are returned as `Err`.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&ToolRegistry>,
        ctx: &mut ToolContext,
    ) -> Result<Generation> {
        let system = match history.filter(|h| !h.is_empty()) {
            Some(history) => format!("{}\n\nPrevious conversation:\n{}", self.system_prompt, history),
            None => self.system_prompt.clone(),
        };

        let tools = tools.filter(|registry| !registry.is_empty());
        let mut request = ModelRequest {
            system,
            messages: vec![Message::user(query)],
            ..ModelRequest::default()
        };
        if let Some(registry) = tools {
            request.tools = registry.definitions();
            request.tool_choice = Some(ToolChoice::Auto);
        }

        let response = self.model.complete(&request).await?;

        let registry = match tools {
            Some(registry)
                if response.stop_reason == StopReason::ToolUse
                    && response.tool_uses().next().is_some() =>
            {
                registry
            }
            _ => {
                debug!("Answered without tools");
                return Ok(Generation::direct(response.text()));
            }
        };

        let (results, tool_calls) = self.run_tools(&response, registry, ctx).await;

        let mut messages = request.messages;
        messages.push(Message::assistant(response.content));
        messages.push(Message::tool_results(results));

        let follow_up = ModelRequest {
            system: request.system,
            messages,
            ..ModelRequest::default()
        };
        let final_response = self.model.complete(&follow_up).await?;

        Ok(Generation {
            answer: final_response.text(),
            tool_calls,
            model_calls: 2,
        })
    }

    /// Execute every tool-use block in order, one result block per call.
    async fn run_tools(
        &self,
        response: &ModelResponse,
        registry: &ToolRegistry,
        ctx: &mut ToolContext,
    ) -> (Vec<ContentBlock>, Vec<ToolCallRecord>) {
        let mut results = Vec::new();
        let mut records = Vec::new();

        for (id, name, input) in response.tool_uses() {
            let output = registry.dispatch(name, input, ctx).await;
            info!("Tool {} returned {} bytes", name, output.len());

            records.push(ToolCallRecord {
                name: name.to_string(),
                arguments: input.to_string(),
                result: output.clone(),
            });
            results.push(ContentBlock::tool_result(id, output));
        }

        (results, records)
    }
}

/// Outcome of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// The final answer text.
    pub answer: String,
    /// Tool calls made while answering, in dispatch order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls used (1 or 2).
    pub model_calls: usize,
}

impl Generation {
    fn direct(answer: String) -> Self {
        Self {
            answer,
            tool_calls: Vec::new(),
            model_calls: 1,
        }
    }
}

/// Record of a tool call made by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
