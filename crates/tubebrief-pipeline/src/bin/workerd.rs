//! tubebrief-workerd - background video processing worker.
//!
//! Connects to PostgreSQL, builds the production gateway and generator from
//! environment configuration, and drains the processing job queue until
//! interrupted.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubebrief_core::config::AppConfig;
use tubebrief_db::Database;
use tubebrief_generate::{
    ChatSummaryBackend, Generator, HttpArtifactStore, MindmapRenderer, SpeechBackend,
};
use tubebrief_pipeline::{JobWorker, VideoProcessor};
use tubebrief_youtube::YouTubeGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   RUST_LOG    - standard env filter (default: "tubebrief=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tubebrief=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = AppConfig::from_env()?;

    info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    info!("Database connected");

    let gateway = Arc::new(YouTubeGateway::new(config.youtube));
    let generator = Arc::new(Generator::new(
        ChatSummaryBackend::new(config.generation),
        MindmapRenderer::new(config.mindmap),
        SpeechBackend::new(config.speech),
        Arc::new(HttpArtifactStore::new(config.storage)),
    ));

    let processor = Arc::new(VideoProcessor::new(
        gateway,
        generator,
        Arc::new(db.subscriptions),
        Arc::new(db.videos),
    ));

    let worker = JobWorker::new(Arc::new(db.jobs), processor, config.worker);
    let handle = worker.start();

    info!("Worker running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.shutdown().await?;
    Ok(())
}
