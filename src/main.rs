use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_api::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{create_redis_client, FileStore, KeyValueStore, RedisStore, StorageWriter},
    services::{
        catalog::TmdbClient, identity::IdentityToolkitProvider, ProfileStore,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::File => Arc::new(
            FileStore::open(&config.storage_dir)
                .await
                .with_context(|| format!("Failed to open storage dir {}", config.storage_dir))?,
        ),
        StorageBackend::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            Arc::new(
                RedisStore::connect(client)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
    };
    tracing::info!(backend = store.name(), "Profile storage ready");

    let (writer, writer_handle) = StorageWriter::spawn(store.clone());
    let profile = Arc::new(ProfileStore::load(store.as_ref(), writer).await);

    let catalog = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_access_token.clone(),
        config.tmdb_api_url.clone(),
    ));
    let identity = Arc::new(IdentityToolkitProvider::new(
        config.identity_api_key.clone(),
        config.identity_api_url.clone(),
    ));

    let state = AppState::new(profile, catalog, identity);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Pending profile writes reach storage before exit
    writer_handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
