use crate::config::Config;
use crate::probe::{ffprobe_from_config, Prober};
use crate::requirements::RequirementsStore;
use crate::service::ValidationService;
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_api;

pub const HEALTH_MESSAGE: &str = "Video validator server is running";

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub service: Arc<ValidationService>,
}

impl AppContext {
    /// Build the context with an explicit prober.
    pub fn new(config: Config, prober: Arc<dyn Prober>) -> Self {
        let requirements = Arc::new(RequirementsStore::new(
            config.validation.requirements_path.clone(),
        ));
        let service = ValidationService::from_config(&config, requirements, prober);
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Build the context with the ffprobe prober from the `[tools]` section.
    pub fn from_config(config: Config) -> Self {
        let prober = ffprobe_from_config(&config.tools);
        Self::new(config, Arc::new(prober))
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes_api::api_routes())
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "message": HEALTH_MESSAGE,
        })),
    )
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::from_config(config);

    // Surface a broken requirements file at startup; requests keep retrying.
    if let Err(e) = ctx.service.requirements().load() {
        tracing::error!("Requirements unavailable: {}", e);
    }

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
