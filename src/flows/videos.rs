//! Video discovery through a single tool-calling exchange.
//!
//! The model derives search keywords from the location and calls the
//! `get_posts` tool; the raw search response is fed back as the tool result
//! and the model's final answer is decoded into [`VideoCandidate`]s.

use super::types::VideoCandidate;
use crate::config::Prompts;
use crate::error::{PostbotError, Result};
use crate::gemini::{
    Content, FunctionCall, FunctionDeclaration, GenerateContentRequest, GenerationConfig,
    GenerativeModel, Tool,
};
use crate::parse::parse_list;
use crate::search::VideoSearch;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Name of the search tool offered to the model.
pub const SEARCH_TOOL_NAME: &str = "get_posts";

const FLOW: &str = "videos";

/// Tool declaration for keyword video search.
pub fn search_tool() -> Tool {
    Tool::functions(vec![FunctionDeclaration {
        name: SEARCH_TOOL_NAME.to_string(),
        description: "Get the tiktok posts by keywords".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "key words to search posts by"
                }
            },
            "required": ["keywords"]
        }),
    }])
}

/// State of the tool-calling exchange.
#[derive(Debug)]
enum Exchange {
    /// Prompt sent, waiting for the model to request a search.
    AwaitingToolCall,
    /// Search done, waiting for the model's final answer.
    AwaitingFinalAnswer {
        tool_turn: Content,
        search_body: String,
    },
    Done(Vec<VideoCandidate>),
}

/// Tool-calling video discovery flow.
pub struct VideoDiscovery {
    model: Arc<dyn GenerativeModel>,
    search: Arc<dyn VideoSearch>,
    prompts: Arc<Prompts>,
    generation: Option<GenerationConfig>,
    tool: Tool,
}

impl VideoDiscovery {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        search: Arc<dyn VideoSearch>,
        prompts: Arc<Prompts>,
    ) -> Self {
        Self {
            model,
            search,
            prompts,
            generation: Some(GenerationConfig {
                temperature: Some(0.0),
                ..Default::default()
            }),
            tool: search_tool(),
        }
    }

    /// Override the sampling parameters of the keyword-extraction call.
    ///
    /// The final-answer call always uses the model's default sampling.
    pub fn with_generation_config(mut self, config: Option<GenerationConfig>) -> Self {
        self.generation = config;
        self
    }

    /// Find videos about `location`. Any failure yields an empty list.
    #[instrument(skip(self))]
    pub async fn discover(&self, location: &str) -> Vec<VideoCandidate> {
        match self.run(location).await {
            Ok(videos) => {
                info!("Found {} videos", videos.len());
                videos
            }
            Err(e) => {
                warn!(flow = FLOW, fallback = true, error = %e, "Video discovery failed");
                Vec::new()
            }
        }
    }

    async fn run(&self, location: &str) -> Result<Vec<VideoCandidate>> {
        let prompt = Content::user_text(self.render_prompt(location));
        let mut state = Exchange::AwaitingToolCall;

        loop {
            state = match state {
                Exchange::AwaitingToolCall => {
                    let response = self
                        .model
                        .generate_content(self.request(vec![prompt.clone()], self.generation.as_ref()))
                        .await?;

                    match response.function_call() {
                        Some(call) => {
                            let params = tool_params(call)?;
                            debug!("Search params: {:?}", params);

                            let tool_turn = response.first_content().cloned().ok_or_else(|| {
                                PostbotError::ToolCall("Tool call without content".to_string())
                            })?;
                            let search_body = self.search.search(&params).await?;

                            Exchange::AwaitingFinalAnswer {
                                tool_turn,
                                search_body,
                            }
                        }
                        None => {
                            warn!(flow = FLOW, "Model answered without calling {}", SEARCH_TOOL_NAME);
                            Exchange::Done(parse_list(FLOW, &response.text()))
                        }
                    }
                }

                Exchange::AwaitingFinalAnswer {
                    tool_turn,
                    search_body,
                } => {
                    let history = vec![
                        prompt.clone(),
                        tool_turn,
                        Content::function_response(
                            SEARCH_TOOL_NAME,
                            json!({ "content": search_body }),
                        ),
                    ];

                    let response = self.model.generate_content(self.request(history, None)).await?;
                    Exchange::Done(parse_list(FLOW, &response.text()))
                }

                Exchange::Done(videos) => return Ok(videos),
            };
        }
    }

    fn render_prompt(&self, location: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("location".to_string(), location.to_string());
        self.prompts.render_with_custom(&self.prompts.videos.user, &vars)
    }

    fn request(
        &self,
        contents: Vec<Content>,
        generation: Option<&GenerationConfig>,
    ) -> GenerateContentRequest {
        let request = GenerateContentRequest::new(contents).with_tool(self.tool.clone());
        match generation {
            Some(config) => request.with_generation_config(config.clone()),
            None => request,
        }
    }
}

/// Turn tool-call arguments into query parameters.
///
/// Strings are forwarded verbatim, `null` is dropped, anything else is sent
/// as compact JSON text.
pub fn tool_params(call: &FunctionCall) -> Result<Vec<(String, String)>> {
    if call.name != SEARCH_TOOL_NAME {
        return Err(PostbotError::ToolCall(format!("Unknown tool: {}", call.name)));
    }

    Ok(call
        .args
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect())
}
