use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::web::models::Message;

/// Failures talking to the completion service. The detail is for operators only.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no completion credential configured")]
    MissingCredential,

    #[error("refusing to send an empty conversation")]
    EmptyConversation,

    #[error("request to completion service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Something that turns a conversation into a single generated reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the text of the first choice, or an empty string if there is none.
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl CompletionResponse {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

// Client for the OpenAI chat completions API
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, CompletionError> {
        info!("Using completion service at: {}", config.api_base_url);

        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        if messages.is_empty() {
            return Err(CompletionError::EmptyConversation);
        }

        let url = format!("{}/chat/completions", self.base_url);

        info!("Sending {} message(s) to model {}", messages.len(), model);
        debug!("Messages: {:?}", messages);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&CompletionRequest { model, messages })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Read as text first so a bad payload is reported as malformed, not as transport
        let body = response.text().await?;
        debug!("Response body: {}", body);

        let text = serde_json::from_str::<CompletionResponse>(&body)?.into_text();

        info!("Response length: {} characters", text.len());
        Ok(text)
    }
}
