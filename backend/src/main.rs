use std::sync::Arc;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use greenledger_backend::config::{Config, StorageBackend};
use greenledger_backend::domain::{FootprintService, LedgerStore, TreeStore};
use greenledger_backend::rest::{self, AppState};
use greenledger_backend::storage::{DbConnection, KeyValueStorage, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = Config::from_env()?;

    info!("Setting up storage ({:?})", config.storage);
    let storage: Arc<dyn KeyValueStorage> = match config.storage {
        StorageBackend::Sqlite => Arc::new(DbConnection::new(&config.database_url).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let store: Arc<dyn TreeStore> = Arc::new(LedgerStore::new(storage.clone()));
    let footprint_service = FootprintService::new(storage);
    let state = AppState::new(store, footprint_service);

    // CORS setup to allow a separately served frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = rest::router(state).layer(cors);

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
