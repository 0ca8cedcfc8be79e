// src/analysis/routes.rs

use crate::analysis::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn analysis_routes() -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .route("/api/upload-and-analyze", post(handlers::upload_and_analyze))
}
