pub mod api;
pub mod config;
pub mod middleware;
pub mod orchestrator;
pub mod render;
pub mod server;
pub mod store;
pub mod tmdb;

#[cfg(test)]
mod testutil;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use config::PersistenceBackend;
use orchestrator::{Orchestrator, OrchestratorSettings};
use store::SearchCountStore;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Persistence error: {0}")]
    Store(#[from] store::StoreError),
    #[error("Movie API error: {0}")]
    Fetch(#[from] tmdb::FetchError),
    #[error("Server error: {0}")]
    Server(String),
}

async fn open_store(config: &config::Config) -> Result<Arc<dyn SearchCountStore>, ServerError> {
    let image_base = &config.tmdb.image_base_url;
    let backend = config
        .persistence_backend()
        .ok_or_else(|| ServerError::Server("No persistence backend configured".to_string()))?;

    let store: Arc<dyn SearchCountStore> = match backend {
        PersistenceBackend::Appwrite(appwrite) => {
            info!(
                "Using Appwrite collection {} at {}",
                appwrite.collection_id, appwrite.endpoint
            );
            Arc::new(store::AppwriteStore::new(&appwrite, image_base)?)
        }
        PersistenceBackend::Sqlite(sqlite) => {
            info!("Opening search count database at {}", sqlite.filename);
            Arc::new(store::SqliteStore::new(&sqlite.filename, image_base).await?)
        }
    };

    Ok(store)
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let config = config::Config::from_file(config_path)?.resolve()?;

    info!("Using config file: {}", config_path);
    info!("Movie API: {}", config.tmdb.api_base_url);
    if debug_logs {
        info!("Debug logging enabled");
    }

    let source = Arc::new(tmdb::TmdbClient::new(&config.tmdb, config.tmdb_token())?);
    let store = open_store(&config).await?;

    let settings = OrchestratorSettings::from(&config.ui);
    info!(
        "Search debounce {}ms, trending limit {}",
        settings.debounce.as_millis(),
        settings.trending_limit
    );
    let orchestrator = Orchestrator::mount(source, store, settings);

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config, orchestrator.clone());
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    orchestrator.shutdown();
    Ok(())
}
