//! Meeting Room Reservations Backend
//!
//! Serves the reservation API over HTTP, backed by a SQLite document store.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meeting_reservations::config::Config;
use meeting_reservations::db::{self, Repository};
use meeting_reservations::service::ReservationService;
use meeting_reservations::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting meeting room reservation backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize the document store
    let pool = db::init_database(&config.db_path).await?;
    let service = ReservationService::new(Arc::new(Repository::new(pool)));

    let existing = service.list_all().await?;
    tracing::info!("Document store holds {} reservations", existing.len());

    let state = AppState { service };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
