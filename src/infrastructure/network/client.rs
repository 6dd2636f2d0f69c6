use crate::domain::error::NlqError;
use crate::domain::model::{ModelReply, PromptContext};
use crate::domain::traits::ModelClient;
use crate::infrastructure::config::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const MAX_ERROR_BODY_CHARS: usize = 500;

// OpenAI-compatible chat completion structures
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<UpstreamError>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ReplyMessage>,
    // Legacy completions shape
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum UpstreamError {
    Detailed { message: String },
    Plain(String),
    Other(serde_json::Value),
}

impl UpstreamError {
    fn into_message(self) -> String {
        match self {
            UpstreamError::Detailed { message } | UpstreamError::Plain(message) => message,
            UpstreamError::Other(value) => value.to_string(),
        }
    }
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint (vLLM, OpenAI, ...).
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(client: Client, config: &LlmConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn send(&self, prompt: &PromptContext, question: &str) -> Result<ModelReply, NlqError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(NlqError::MissingCredential)?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system_instructions,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!(url = %self.endpoint(), model = %self.model, "sending chat completion");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NlqError::Status {
                status: status.as_u16(),
                body: truncate_chars(&text, MAX_ERROR_BODY_CHARS),
            });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;

        if let Some(error) = parsed.error {
            return Err(NlqError::Upstream(error.into_message()));
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.and_then(|m| m.content).or(choice.text))
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(NlqError::EmptyResponse);
        }

        Ok(ModelReply { raw_text: content })
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
