//! # TechNex API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;
use std::time::Duration;

use actix_web::HttpServer;
use migration::{Migrator, MigratorTrait};
use technex_core::ports::NotificationDispatcher;
use technex_infra::database::connect;
use technex_infra::NotificationQueue;

use api_server::build_app;
use api_server::config::AppConfig;
use api_server::state::{AppState, StartupError};
use api_server::telemetry::{TelemetryConfig, init_telemetry};

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        environment = %config.environment,
        "Starting TechNex API Server on {}:{}",
        config.host,
        config.port
    );

    run(config).await.map_err(|e| {
        tracing::error!(error = %e, "Server failed");
        std::io::Error::other(e.to_string())
    })
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let db = connect(&config.database).await?;

    if config.init_db {
        Migrator::up(&db, None).await?;
        tracing::info!("Database schema is up to date");
    }

    tokio::fs::create_dir_all(&config.upload.dir).await?;

    let queue = Arc::new(NotificationQueue::start(
        config.notifications.clone(),
        config.mail.build_sender(),
        config.mail.build_renderer(),
    ));
    let notifier: Arc<dyn NotificationDispatcher> = queue.clone();

    let bind = (config.host.clone(), config.port);
    let state = AppState::new(db.clone(), config, notifier)?;

    if let Some(admin) = &state.config.bootstrap_admin {
        state.provision_admin(admin).await?;
    }

    let pruning = state.limiters.spawn_pruning(PRUNE_INTERVAL);

    let server_state = state.clone();
    let served = HttpServer::new(move || build_app(server_state.clone()))
        .bind(bind)?
        .run()
        .await;

    tracing::info!("HTTP server stopped, draining notifications");
    pruning.abort();
    queue.shutdown().await;
    drop(state);
    db.close().await?;

    served?;
    Ok(())
}
