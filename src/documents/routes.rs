// src/documents/routes.rs

use crate::documents::handlers;
use axum::{routing::post, Router};

pub fn documents_routes() -> Router {
    Router::new()
        .route("/api/generate-resume", post(handlers::generate_resume))
        .route(
            "/api/generate-cover-letter",
            post(handlers::generate_cover_letter),
        )
}
