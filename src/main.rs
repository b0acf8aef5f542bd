use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

#[cfg(test)]
mod test_support;

use config::settings::AppConfig;
use infrastructure::media::ffmpeg::Ffmpeg;
use infrastructure::queue::rabbitmq::RabbitMqService;
use infrastructure::storage::ObjectStorage;
use infrastructure::storage::s3::StorageService;
use modules::job::analysis::PlaceholderAnalyzer;
use modules::job::service::JobOrchestrator;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_worker=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting media worker...");

    let config = AppConfig::new();

    let storage = config
        .storage
        .as_ref()
        .map(|s| Arc::new(StorageService::new(s)) as Arc<dyn ObjectStorage>);

    let orchestrator = JobOrchestrator::new(
        storage,
        Arc::new(Ffmpeg::new(config.ffmpeg_path.clone(), config.tool_timeout())),
        Arc::new(PlaceholderAnalyzer),
        config.work_dir.clone(),
        config.public_base_url.clone(),
    );

    if !orchestrator.is_configured() {
        warn!("Object storage is not configured; every job will be rejected");
    }

    if let Some(url) = config.rabbitmq_url.as_deref() {
        let queue = RabbitMqService::new(url).await?;
        let consumer_orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            if let Err(e) = workers::job_consumer::start_job_consumer(queue, consumer_orchestrator).await {
                error!("Job consumer stopped: {}", e);
            }
        });
    }

    let port = config.server_port;
    let app = app::create_app(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
