//! API server entry point.

use api::AppState;
use api::config::{Config, CounterStoreKind, LogFormat};
use axum::Router;
use counter_store::{InMemoryCounterStore, RedisCounterStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Load the catalog
    let catalog = config.load_catalog().expect("failed to load catalog");
    tracing::info!(products = catalog.len(), "catalog loaded");

    // 4. Connect the counter store and build the application
    let strategy = config.reservation_strategy;
    let app: Router = match config.counter_store {
        CounterStoreKind::Redis => {
            let store = RedisCounterStore::connect(&config.redis_url)
                .await
                .expect("failed to connect to Redis");
            api::create_app(AppState::new(catalog, store, strategy), metrics_handle)
        }
        CounterStoreKind::Memory => {
            tracing::warn!("using in-memory counter store, counters are not shared");
            let store = InMemoryCounterStore::new();
            api::create_app(AppState::new(catalog, store, strategy), metrics_handle)
        }
    };

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, %strategy, store = ?config.counter_store, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
