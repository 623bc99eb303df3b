mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;
mod tailoring;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{ClassifierBackend, Config};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{KeyValueStore, MemoryStore, RedisStore, REDIS_KEY_PREFIX};
use crate::tailoring::classifier::{
    FallbackClassifier, LlmClassifier, PatternClassifier, TextClassifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on malformed env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Tailor v{}", env!("CARGO_PKG_VERSION"));

    let classifier = build_classifier(&config)?;
    info!("Text classifier initialized (backend: {})", classifier.backend());

    let store = build_store(&config)?;

    let state = AppState::new(config.clone(), classifier, store);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser extension calls from arbitrary origins

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pattern rules by default; the LLM backend is wrapped in a fallback unless disabled.
fn build_classifier(config: &Config) -> Result<Arc<dyn TextClassifier>> {
    match config.classifier {
        ClassifierBackend::Pattern => Ok(Arc::new(PatternClassifier)),
        ClassifierBackend::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required when CLASSIFIER=llm")?;
            let llm = LlmClient::new(api_key).context("Failed to build LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);

            let primary: Arc<dyn TextClassifier> = Arc::new(LlmClassifier(llm));
            if config.classifier_fallback {
                Ok(Arc::new(FallbackClassifier::new(primary)))
            } else {
                Ok(primary)
            }
        }
    }
}

fn build_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisStore::new(url, REDIS_KEY_PREFIX).context("Invalid REDIS_URL")?;
            info!("Redis store initialized");
            Ok(Arc::new(store))
        }
        None => {
            info!("REDIS_URL not set; using in-memory store");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}
