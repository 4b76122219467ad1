use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use crate::web::error::ChatError;
use crate::web::models::{ChatRequest, ChatResponse};
use crate::AppState;

// Liveness probe, no checks
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

// Chat API endpoint
pub async fn chat(data: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ChatError> {
    let req = ChatRequest::from_body(&body);

    let prompt = req.prompt().ok_or(ChatError::MissingPrompt)?;

    if !data.config.has_api_key() {
        error!("Rejecting chat request: OPENAI_API_KEY is not set");
        return Err(ChatError::MissingCredential);
    }

    let model = req.model(&data.config.default_model);
    let messages = req.messages(prompt);

    info!(
        "Chat request for model {} with {} message(s)",
        model,
        messages.len()
    );

    match data.completion.complete(model, &messages).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(ChatResponse { reply })),
        Err(e) => {
            error!("Error with completion API call: {}", e);
            Err(ChatError::from(e))
        }
    }
}
