mod error;
mod handlers;
mod response;
mod types;
mod upload;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use log::info;
use tower_http::trace::TraceLayer;

use crate::core::MergeError;
use crate::service::CombineService;

pub use error::ApiError;

pub struct CombineApi {
    service: Arc<CombineService>,
}

impl CombineApi {
    pub fn new(service: CombineService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn router(&self) -> Router {
        let upload_limit = self.service.config().server.max_upload_bytes;
        Router::new()
            .route("/health", get(handlers::health_handler))
            .route("/v1/combine", post(handlers::combine_handler))
            .route("/v1/sessions", post(handlers::create_session_handler))
            .route(
                "/v1/sessions/{id}",
                get(handlers::get_session_handler).delete(handlers::delete_session_handler),
            )
            .route("/v1/sessions/{id}/query", post(handlers::query_handler))
            .route("/v1/sessions/{id}/continue", post(handlers::continue_handler))
            .route("/v1/sessions/{id}/stop", post(handlers::stop_handler))
            .route("/v1/sessions/{id}/download", get(handlers::download_handler))
            .layer(DefaultBodyLimit::max(upload_limit))
            .layer(TraceLayer::new_for_http())
            .with_state(self.service.clone())
    }

    pub async fn serve(self, addr: &str) -> Result<(), MergeError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| MergeError::IoError(format!("binding to {addr}: {e}")))?;
        info!("listening on {}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| MergeError::IoError(format!("serving: {e}")))?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
