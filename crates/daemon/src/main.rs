//! Spot Queue - Main Entry Point
//!
//! Composition root: wires storage, travel estimation and the RPC surface.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spotqueue_api_rpc::{server::RpcServerConfig, RpcServer};
use spotqueue_core::application::{EngineConfig, QueueEngine, RegistryService};
use spotqueue_core::domain::Coordinates;
use spotqueue_core::port::time_provider::SystemTimeProvider;
use spotqueue_core::port::{CounterRepository, ServiceRepository, UserRepository};
use spotqueue_infra_geo::{DistanceMatrixConfig, DistanceMatrixEstimator};
use spotqueue_infra_sqlite::{create_pool, run_migrations, SqliteRegistry, SqliteTokenRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.spotqueue/queue.db";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("SPOTQUEUE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("spotqueue=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Spot Queue v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("SPOTQUEUE_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let rpc_port: u16 = std::env::var("SPOTQUEUE_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9530);

    let api_key = std::env::var("SPOTQUEUE_DMX_API_KEY").unwrap_or_default();

    let fixed_coordinates = match (
        std::env::var("SPOTQUEUE_FIXED_LAT")
            .ok()
            .and_then(|s| s.parse::<f64>().ok()),
        std::env::var("SPOTQUEUE_FIXED_LON")
            .ok()
            .and_then(|s| s.parse::<f64>().ok()),
    ) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
        _ => EngineConfig::default().fixed_coordinates,
    };

    let handoff_delay = std::env::var("SPOTQUEUE_HANDOFF_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(EngineConfig::default().handoff_delay);

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let token_repo = Arc::new(SqliteTokenRepository::new(pool.clone()));
    let registry_repo = Arc::new(SqliteRegistry::new(pool.clone()));
    let user_repo: Arc<dyn UserRepository> = registry_repo.clone();
    let service_repo: Arc<dyn ServiceRepository> = registry_repo.clone();
    let counter_repo: Arc<dyn CounterRepository> = registry_repo.clone();

    let mut dmx_config = DistanceMatrixConfig::new(api_key, fixed_coordinates);
    if let Ok(base_url) = std::env::var("SPOTQUEUE_DMX_BASE_URL") {
        dmx_config.base_url = base_url;
    }
    let travel_estimator = Arc::new(DistanceMatrixEstimator::new(dmx_config));

    let engine_config = EngineConfig {
        fixed_coordinates,
        handoff_delay,
    };

    let engine = Arc::new(QueueEngine::new(
        engine_config,
        token_repo.clone(),
        token_repo.clone(),
        user_repo.clone(),
        service_repo.clone(),
        counter_repo.clone(),
        travel_estimator,
        time_provider.clone(),
    ));

    let registry = Arc::new(RegistryService::new(user_repo, service_repo, counter_repo));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, engine, registry);
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
