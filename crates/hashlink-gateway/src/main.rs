mod cli;

use crate::cli::{Cli, StorageBackendArg};
use clap::Parser;
use hashlink_core::Shortener;
use hashlink_gateway::{App, AppState};
use hashlink_generator::{DigestGenerator, DigestGeneratorSettings};
use hashlink_shortener::{ShortenerService, ShortenerSettings};
use hashlink_storage::{InMemoryRepository, JsonFileRepository};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    hashlink_telemetry::init(config.log_format.into())?;

    let generator = DigestGenerator::new(
        DigestGeneratorSettings::builder()
            .algorithm(config.hash_algorithm.into())
            .token_length(config.token_length)
            .build(),
    )?;
    let settings = ShortenerSettings::builder()
        .base_url(config.base_url.clone())
        .collision(config.collision_policy.into())
        .build();

    info!(
        base_url = %settings.base_url,
        storage_backend = %config.storage,
        hash_algorithm = %generator.algorithm(),
        token_length = generator.token_length(),
        collision_policy = %settings.collision,
        "configuring shortener"
    );

    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(ShortenerService::new(
            InMemoryRepository::new(),
            generator,
            settings,
        )),
        StorageBackendArg::JsonFile => Arc::new(ShortenerService::new(
            JsonFileRepository::open(&config.db_path)?,
            generator,
            settings,
        )),
    };

    let app = App::router(AppState::new(shortener));
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
