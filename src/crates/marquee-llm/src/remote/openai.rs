//! OpenAI-compatible chat-completions client.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` surface. Supports both one-shot completion and SSE
//! token streaming.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_llm::{OpenAiChat, RemoteLlmConfig};
//! use marquee_core::llm::{ChatModel, ChatRequest};
//! use marquee_core::messages::Message;
//!
//! let config = RemoteLlmConfig::from_env(
//!     "OPENAI_API_KEY",
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//! )?;
//! let client = OpenAiChat::new(config);
//!
//! let request = ChatRequest::new(vec![Message::user("Hello!")]);
//! let text = client.stream(request).await?.collect_text().await?;
//! ```

use crate::config::RemoteLlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use futures::StreamExt;
use marquee_core::error::{EngineError, Result as CoreResult};
use marquee_core::llm::{ChatModel, ChatRequest, ChatResponse, ChatStream, StreamChunk, UsageMetadata};
use marquee_core::messages::{Message, MessageRole};
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Sentinel the server sends when the stream is complete.
const STREAM_DONE_MARKER: &str = "[DONE]";

/// OpenAI-compatible API client.
#[derive(Clone)]
pub struct OpenAiChat {
    config: RemoteLlmConfig,
    client: Client,
}

impl OpenAiChat {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { config, client }
    }

    fn convert_message(&self, msg: &Message) -> OpenAiMessage {
        OpenAiMessage {
            role: match msg.role {
                MessageRole::System => "system".to_string(),
                MessageRole::User => "user".to_string(),
                MessageRole::Assistant => "assistant".to_string(),
                // Function results ride as system messages; the text
                // protocol has no native tool role.
                MessageRole::Tool => "system".to_string(),
            },
            content: msg.content.clone(),
        }
    }

    fn build_body(&self, request: &ChatRequest, stream: bool) -> OpenAiRequest {
        OpenAiRequest {
            model: request
                .config
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            messages: request
                .messages
                .iter()
                .map(|m| self.convert_message(m))
                .collect(),
            temperature: request.config.temperature,
            max_tokens: request.config.max_tokens,
            stream,
        }
    }

    fn request_builder(&self, body: &OpenAiRequest) -> reqwest::RequestBuilder {
        let url = format!("{}/chat/completions", self.config.base_url);
        let mut req = self
            .client
            .post(&url)
            .json(body)
            .header("Authorization", format!("Bearer {}", self.config.api_key));

        if let Some(org) = &self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }

        req
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn chat(&self, request: ChatRequest) -> CoreResult<ChatResponse> {
        let body = self.build_body(&request, false);
        let response = self
            .request_builder(&body)
            .send()
            .await
            .map_err(LlmError::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationError(error_text),
                429 => LlmError::RateLimitExceeded(error_text),
                _ => LlmError::ProviderError(format!("API error {status}: {error_text}")),
            }
            .into());
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response carried no choices".to_string()))?;

        Ok(ChatResponse {
            message: Message::assistant(choice.message.content),
            usage: parsed
                .usage
                .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens)),
        })
    }

    async fn stream(&self, request: ChatRequest) -> CoreResult<ChatStream> {
        let body = self.build_body(&request, true);
        let mut source = EventSource::new(self.request_builder(&body))
            .map_err(|e| LlmError::ProviderError(format!("failed to open SSE stream: {e}")))?;

        let (tx, stream) = ChatStream::channel();

        tokio::spawn(async move {
            while let Some(event) = source.next().await {
                match event {
                    Ok(Event::Open) => {}
                    Ok(Event::Message(message)) => {
                        if message.data == STREAM_DONE_MARKER {
                            let _ = tx.send(Ok(StreamChunk::Done)).await;
                            source.close();
                            return;
                        }
                        match serde_json::from_str::<OpenAiStreamChunk>(&message.data) {
                            Ok(chunk) => {
                                let token = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|c| c.delta.content);
                                if let Some(token) = token {
                                    if tx.send(Ok(StreamChunk::Token(token))).await.is_err() {
                                        // Consumer dropped the stream.
                                        source.close();
                                        return;
                                    }
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "unparseable stream chunk");
                                let _ = tx
                                    .send(Err(LlmError::InvalidResponse(format!(
                                        "unparseable stream chunk: {e}"
                                    ))
                                    .into()))
                                    .await;
                                source.close();
                                return;
                            }
                        }
                    }
                    Err(reqwest_eventsource::Error::InvalidStatusCode(status, _response)) => {
                        let err = match status.as_u16() {
                            401 => LlmError::AuthenticationError(status.to_string()),
                            429 => LlmError::RateLimitExceeded(status.to_string()),
                            _ => LlmError::ProviderError(format!("API error {status}")),
                        };
                        let _ = tx.send(Err(err.into())).await;
                        source.close();
                        return;
                    }
                    Err(reqwest_eventsource::Error::StreamEnded) => {
                        // Server closed without sending the done marker.
                        let _ = tx
                            .send(Err(EngineError::StreamIncomplete(
                                "server closed the stream before completion".to_string(),
                            )))
                            .await;
                        source.close();
                        return;
                    }
                    Err(e) => {
                        debug!(error = %e, "stream transport error");
                        let _ = tx
                            .send(Err(EngineError::StreamIncomplete(e.to_string())))
                            .await;
                        source.close();
                        return;
                    }
                }
            }
        });

        Ok(stream)
    }

    fn clone_box(&self) -> Box<dyn ChatModel> {
        Box::new(self.clone())
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
}

#[derive(Debug, Deserialize, Default)]
struct OpenAiDelta {
    #[serde(default)]
    content: Option<String>,
}
