//! HTTP routes for the hosted model

use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use cost_model::InferenceHandler;

use crate::config::MAX_BODY_BYTES;
use crate::error::ServerError;

/// Loaded model shared by every request task
pub struct InferenceServer {
    handler: InferenceHandler,
}

impl InferenceServer {
    pub fn new(handler: InferenceHandler) -> Self {
        Self { handler }
    }

    /// Load artifacts from `model_dir`; the server does not start without them
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self, ServerError> {
        let model_dir = model_dir.as_ref();
        let handler = InferenceHandler::load(model_dir)?;
        info!(
            model_dir = %model_dir.display(),
            features = handler.service().model().schema().width(),
            "Model loaded"
        );
        Ok(Self::new(handler))
    }

    pub fn handler(&self) -> &InferenceHandler {
        &self.handler
    }

    pub fn create_router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/ping", get(Self::ping_handler))
            .route("/invocations", post(Self::invocations_handler))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
            .with_state(self)
    }

    async fn ping_handler() -> impl IntoResponse {
        (StatusCode::OK, Json(json!({ "status": "healthy" })))
    }

    async fn invocations_handler(
        State(state): State<Arc<Self>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, ServerError> {
        let content_type = header_str(&headers, header::CONTENT_TYPE).unwrap_or_default();
        let accept = header_str(&headers, header::ACCEPT);

        let (payload, media_type) = state.handler.invoke(&body, content_type, accept)?;
        Ok(([(header::CONTENT_TYPE, media_type)], payload).into_response())
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
