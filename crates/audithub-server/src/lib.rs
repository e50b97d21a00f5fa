//! HTTP surface of audithub
//!
//! A thin request/response façade over [`AuditStore`]: JSON endpoints under
//! `/api`, the embedded single-page UI at `/`, permissive CORS on every
//! response and JSON error bodies throughout.

mod api;
mod error;
mod middleware;
mod ui;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::Layer;

use audithub_store::AuditStore;

pub use error::ApiError;
pub use ui::INDEX_HTML;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<AuditStore>,
}

impl AppState {
    pub fn new(store: AuditStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(ui::index))
        .route("/index.html", get(ui::index))
        .route("/healthz", get(api::healthz))
        .route("/api/diagnostics", get(api::diagnostics))
        .route("/api/audits", get(api::list_audits))
        .route("/api/audits/:feature", get(api::audit_summary))
        .route("/api/audits/:feature/checklist", get(api::checklist))
        .route(
            "/api/audits/:feature/results",
            get(api::results).post(api::save_results),
        )
        .fallback(api::not_found)
        .with_state(state);

    // Path rewrites must happen before routing, so this wraps the router
    // instead of being layered onto it.
    let routes = from_fn(middleware::trim_trailing_slash).layer(routes);

    Router::new()
        .fallback_service(routes)
        .layer(from_fn(middleware::json_method_not_allowed))
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::request_log))
}

/// Serve `state` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
