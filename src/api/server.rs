//! Excel Generator API Server implementation
//!
//! HTTP server using Axum. [`AppContext`] is built once at startup, started
//! into a [`RunningServer`] and stopped explicitly.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers;

/// Default request body limit (10 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body, in bytes
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
}

/// Application context: configuration plus the state handed to handlers.
pub struct AppContext {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Build the router with all routes and middleware
    pub fn router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            // Status endpoints
            .route("/", get(handlers::root).fallback(handlers::not_found))
            .route("/health", get(handlers::health).fallback(handlers::not_found))
            // Workbook generation
            .route(
                "/generate-excel",
                post(handlers::generate_excel).fallback(handlers::not_found),
            )
            .fallback(handlers::not_found)
            // State and middleware
            .with_state(self.state())
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .layer(CatchPanicLayer::custom(handlers::panic_response))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the listener and start serving in the background
    pub async fn start(self) -> anyhow::Result<RunningServer> {
        let addr = self.config.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let app = self.router();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender also stops the server
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("🚀 Excel Generator Service running on http://{}", local_addr);
        info!("   Endpoints: GET /, GET /health, POST /generate-excel");

        Ok(RunningServer {
            local_addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a started server
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address the listener is bound to (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.task.await??;
        info!("Excel Generator Service shutdown complete");
        Ok(())
    }
}

/// Install the global tracing subscriber
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "excel_generator=info,tower_http=info".into()),
        )
        .init();
}

/// Start the service and run it until SIGINT/SIGTERM
pub async fn run_until_signal(config: ServerConfig) -> anyhow::Result<()> {
    let server = AppContext::new(config).start().await?;
    shutdown_signal().await;
    server.stop().await
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
