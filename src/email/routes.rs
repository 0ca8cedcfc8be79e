// src/email/routes.rs

use crate::email::handlers;
use axum::{routing::post, Router};

pub fn email_routes() -> Router {
    Router::new().route("/api/send-email", post(handlers::send_application_email))
}
