use actix_web::{web, HttpResponse};

use crate::web::handlers;

/// Upper bound on an API request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(handlers::health_check))
        .service(
            web::scope("/api")
                .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
                .route("/chat", web::post().to(handlers::chat))
                // Unmatched API paths must not fall through to the static files
                .default_service(web::to(|| async { HttpResponse::NotFound().finish() })),
        );
}
