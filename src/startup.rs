use crate::components::{
    ComponentManager, EventService, EventStore, InMemoryStore, JsonFileStore, Reminders,
};
use crate::config::{Config, StoreBackend};
use crate::error::{Error, SchedulerResult};
use crate::shutdown;
use crate::web::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Construct the configured event store backend
pub fn build_store(config: &Config) -> SchedulerResult<Arc<dyn EventStore>> {
    match config.store_backend {
        StoreBackend::File => {
            info!("Using JSON file store at {}", config.data_file);
            Ok(Arc::new(JsonFileStore::new(&config.data_file)))
        }
        StoreBackend::Memory => {
            info!("Using in-memory event store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(feature = "redis-store")]
        StoreBackend::Redis => {
            info!("Using Redis event store at {}", config.redis_url);
            Ok(Arc::new(crate::components::event_store::RedisStore::spawn(
                &config.redis_url,
            )?))
        }
        #[cfg(not(feature = "redis-store"))]
        StoreBackend::Redis => Err(crate::error::config_error(
            "Redis backend requested but the redis-store feature is disabled",
        )),
    }
}

/// Start background components and serve the HTTP API until shutdown
pub async fn start_server(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (store, addr) = {
        let config_read = config.read().await;
        let store = build_store(&config_read)?;
        let addr: SocketAddr = format!("{}:{}", config_read.host, config_read.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))?;
        (store, addr)
    };

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register reminder component
    component_manager.register(Reminders::new());

    let component_manager = Arc::new(component_manager);
    component_manager.init_all(Arc::clone(&store)).await?;

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    let shutdown_components = Arc::clone(&component_manager);
    let shutdown_store = Arc::clone(&store);
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_store).await;
    });

    let app = router(AppState::new(EventService::new(store)));

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_recv.await;
            info!("Received shutdown signal, stopping HTTP server...");
        })
        .await
        .map_err(Error::from)?;

    Ok(())
}
