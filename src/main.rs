use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nexus_chat::{
    build_router,
    registry::{spawn_registry, start_cleanup_task},
    AppState, InMemoryConnectionManager, ServerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexus_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Nexus chat server");

    let config = ServerConfig::from_env();
    info!(
        allowed_origins = ?config.allowed_origins,
        room_cleanup_interval = ?config.room_cleanup_interval,
        "Loaded configuration"
    );

    let connection_manager = Arc::new(InMemoryConnectionManager::new());
    let (registry, _registry_task) = spawn_registry(connection_manager.clone());

    if let Some(cleanup_config) = config.cleanup_config() {
        tokio::spawn(start_cleanup_task(registry.clone(), cleanup_config));
    }

    let app_state = AppState::new(registry, connection_manager);
    let app = build_router(app_state, &config);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap();
    info!("Nexus chat server is running on http://{}", address);
    axum::serve(listener, app).await.unwrap();
}
