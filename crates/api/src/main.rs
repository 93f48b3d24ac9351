use std::net::SocketAddr;
use std::sync::Arc;

use noteguard_core::signer::Signer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noteguard_api::config::{ServerConfig, StorageConfig};
use noteguard_api::entitlements::{
    EntitlementChecker, PaymentsEntitlementClient, StaticEntitlements,
};
use noteguard_api::router::build_app_router;
use noteguard_api::state::AppState;
use noteguard_api::storage::ObjectStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noteguard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let signer = Signer::new(&config.access.watermark_secret);

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = noteguard_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    noteguard_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    noteguard_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object store ---
    let storage_config = StorageConfig::from_env();
    if let StorageConfig::Fs { root } = &storage_config {
        std::fs::create_dir_all(root).expect("Failed to create storage root");
    }
    let store = ObjectStore::from_config(&storage_config).expect("Failed to build object store");
    tracing::info!("Object store ready");

    // --- Entitlements ---
    let entitlements: Arc<dyn EntitlementChecker> = match &config.entitlement_service_url {
        Some(url) => Arc::new(PaymentsEntitlementClient::new(url.clone())),
        None => {
            tracing::warn!(
                "ENTITLEMENT_SERVICE_URL not set; premium notes are locked for all users"
            );
            Arc::new(StaticEntitlements::deny_all())
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        signer,
        store,
        entitlements,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
