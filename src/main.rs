mod completion;
mod config;
mod web;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use completion::{CompletionClient, OpenAiClient};
use config::Config;
use web::{routes, static_files};

// Shared, read-only state for every request
pub struct AppState {
    config: Config,
    completion: Arc<dyn CompletionClient>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    info!("Starting chat relay");
    if !config.has_api_key() {
        warn!("OPENAI_API_KEY is not set; /api/chat will answer with a configuration error");
    }
    if !config.entry_document().is_file() {
        warn!(
            "Entry document {} not found; client routes will answer 404",
            config.entry_document().display()
        );
    }
    info!("Default model: {}", config.default_model);
    info!("Serving static files from {}", config.static_dir.display());

    let completion = OpenAiClient::new(&config).context("failed to build completion client")?;

    let bind_addr = (config.host.clone(), config.port);
    let static_dir = config.static_dir.clone();

    let app_state = Data::new(AppState {
        config,
        completion: Arc::new(completion),
    });

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(static_files::service(&static_dir))
    })
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?;

    for addr in server.addrs() {
        info!("Server listening on port {} ({})", addr.port(), addr);
    }

    server.run().await?;
    Ok(())
}
