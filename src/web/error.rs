use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::completion::CompletionError;
use crate::web::models::ChatResponse;

pub const MISSING_PROMPT_REPLY: &str = "Please provide a user prompt.";
pub const MISCONFIGURED_REPLY: &str = "Server misconfigured: missing OPENAI_API_KEY.";
pub const UPSTREAM_FAILURE_REPLY: &str =
    "Sorry, something went wrong with the AI service. Please try again.";

/// Every way `/api/chat` can fail. The `Display` text is for logs; clients only
/// ever see [`ChatError::reply`].
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request has no user prompt")]
    MissingPrompt,

    #[error("OPENAI_API_KEY is not configured")]
    MissingCredential,

    #[error(transparent)]
    Upstream(#[from] CompletionError),
}

impl ChatError {
    /// The client-facing message for this failure kind.
    pub fn reply(&self) -> &'static str {
        match self {
            ChatError::MissingPrompt => MISSING_PROMPT_REPLY,
            ChatError::MissingCredential => MISCONFIGURED_REPLY,
            ChatError::Upstream(_) => UPSTREAM_FAILURE_REPLY,
        }
    }
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::MissingPrompt => StatusCode::BAD_REQUEST,
            ChatError::MissingCredential | ChatError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ChatResponse {
            reply: self.reply().to_string(),
        })
    }
}
