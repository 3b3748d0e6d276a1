//! hatescan-server: HTTP front end for the hate speech classifier.
//!
//! Configuration comes from the environment (and `.env`), see
//! [`hatescan_server::config`]. `DATABASE_URL` enables the prediction log
//! and `POST /feedback`.

use std::sync::Arc;

use anyhow::Context;
use hatescan_core::vocab::Vocabulary;
use hatescan_server::{
    build_router, AppState, PgPredictionStore, PredictionService, PredictionStore,
    RestModelRuntime, ServerConfig,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hatescan_server=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let vocab = Vocabulary::load(&config.vocab_path)
        .with_context(|| format!("failed to load vocabulary from {}", config.vocab_path.display()))?;
    tracing::info!(
        "Loaded vocabulary from {}: {}",
        config.vocab_path.display(),
        vocab.stats()
    );

    let runtime = RestModelRuntime::new(config.model_url.clone(), config.model_timeout)?;
    tracing::info!(
        "Model runtime at {} (timeout {:?})",
        runtime.url(),
        config.model_timeout
    );

    let service = PredictionService::new(
        Arc::new(vocab),
        Arc::new(runtime),
        config.encoder_config(),
    )?;

    let store: Option<Arc<dyn PredictionStore>> = match &config.database {
        Some(database) => Some(Arc::new(PgPredictionStore::connect(database).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, predictions will not be recorded");
            None
        }
    };

    let app = build_router(AppState {
        service: Arc::new(service),
        store,
    });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("hatescan-server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
