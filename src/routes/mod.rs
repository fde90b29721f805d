use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::EngineConfig,
    db::Cache,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{catalog::CatalogStore, engagement::EngagementStore},
};

pub mod recommendations;

/// Shared state handed to every handler.
///
/// Stores are trait objects so tests can swap in in-memory fakes without
/// touching the router.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub engagement: Arc<dyn EngagementStore>,
    pub cache: Cache,
    pub engine: Arc<EngineConfig>,
}

/// Creates the application router with all routes and layers.
///
/// The request id middleware sits outside the trace layer so the span
/// for each request already carries the correlation id.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(crate::middleware::request_id::REQUEST_ID_HEADER),
        ]);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
