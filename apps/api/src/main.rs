//! Meridian API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use meridian_application::{EventLogRepository, EventRepository, ProfileRepository};
use meridian_core::AppError;
use meridian_domain::TimezoneCatalog;
use meridian_infrastructure::{
    InMemoryEventLogRepository, InMemoryEventRepository, InMemoryProfileRepository,
    PostgresEventLogRepository, PostgresEventRepository, PostgresProfileRepository,
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, StorageConfig};
use crate::state::AppState;

type Repositories = (
    Arc<dyn ProfileRepository>,
    Arc<dyn EventRepository>,
    Arc<dyn EventLogRepository>,
);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let Some((profiles, events, event_logs)) = build_repositories(&config).await? else {
        return Ok(());
    };

    let timezone_catalog = Arc::new(TimezoneCatalog::from_tz_database());
    let app_state = AppState::from_repositories(
        profiles,
        events,
        event_logs,
        timezone_catalog,
        config.event_list_limits,
    );
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "meridian-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

/// Returns `None` when the process only applied migrations.
async fn build_repositories(config: &ApiConfig) -> Result<Option<Repositories>, AppError> {
    match &config.storage {
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            sqlx::migrate!("../../crates/infrastructure/migrations")
                .run(&pool)
                .await
                .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(None);
            }

            Ok(Some((
                Arc::new(PostgresProfileRepository::new(pool.clone())),
                Arc::new(PostgresEventRepository::new(pool.clone())),
                Arc::new(PostgresEventLogRepository::new(pool)),
            )))
        }
        StorageConfig::InMemory => {
            warn!("using in-memory storage; data is lost on restart");
            Ok(Some((
                Arc::new(InMemoryProfileRepository::new()),
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(InMemoryEventLogRepository::new()),
            )))
        }
    }
}
