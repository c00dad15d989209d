//! appr registry HTTP server
//!
//! Serves manifests and blobs from a pluggable storage backend, gated by a
//! pluggable access authority.

use std::net::SocketAddr;
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use appr_server::config::{AuthBackend, ServerConfig, StorageBackend};
use appr_server::{
    AppState, Authorization, FsStorage, MemoryStorage, NoopAuth, Storage, TokenAuth, router,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "appr_server=debug,tower_http=debug".to_string()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let storage: Arc<dyn Storage> = match config.storage {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Fs => Arc::new(FsStorage::new(&config.storage_root).await?),
    };

    let auth: Arc<dyn Authorization> = match config.auth {
        AuthBackend::Noop => Arc::new(NoopAuth),
        AuthBackend::Token => Arc::new(TokenAuth::new(config.auth_tokens.clone())),
    };

    let app = router(AppState::new(storage, auth)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("appr registry listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
