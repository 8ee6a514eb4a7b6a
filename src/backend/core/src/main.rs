//! CareLink Server - Main entry point

use std::net::SocketAddr;
use std::sync::Arc;

use carelink_core::{
    access::registry::NavigationRegistry,
    access::session::InMemorySessionStore,
    api::{self, AppState},
    config::Config,
    middleware::auth::AuthConfig,
    observability,
    store::MockStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config: {}. Using defaults.", e);
        Config::default()
    });

    // Initialize observability
    observability::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting CareLink Server"
    );

    // Create the data store
    let store = Arc::new(MockStore::new(&config.mock_store));
    tracing::info!(
        latency_ms = config.mock_store.latency.as_millis() as u64,
        fail_reads = config.mock_store.fail_reads,
        "Mock store initialized"
    );

    // Navigation registry and session store
    let registry = Arc::new(NavigationRegistry::standard());
    let sessions = Arc::new(InMemorySessionStore::new());
    tracing::info!(entries = registry.len(), "Navigation registry loaded");

    // Auth configuration
    let token_ttl = chrono::Duration::from_std(config.auth.token_ttl)
        .map_err(|e| anyhow::anyhow!("Invalid token TTL: {}", e))?;
    let auth_config = AuthConfig::new(config.auth.jwt_secret.clone()).with_token_ttl(token_ttl);

    // Create app state
    let app_state = AppState {
        store,
        registry,
        sessions,
    };

    // Build router
    let app = api::build_router(app_state, auth_config);

    // Start server
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));
    tracing::info!(address = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
