// src/main.rs
use axum::{extract::Extension, Router};
use dotenv::dotenv;
use std::env;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod analysis;
mod common;
mod documents;
mod email;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::AppState;
use documents::store::ArtifactStore;
use services::mailer::MailerConfig;
use services::{GeminiService, MailerService};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let gemini_api_key = env::var("GEMINI_API_KEY").ok();
    let gemini_model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
    let gemini_base_url = env::var("GEMINI_BASE_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
    let generated_dir = env::var("GENERATED_DIR").unwrap_or_else(|_| "./generated".to_string());
    let smtp_server = env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string());
    let smtp_port = env::var("SMTP_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(587);
    let sender_email = env::var("SENDER_EMAIL").ok();
    let sender_password = env::var("SENDER_PASSWORD").ok();

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let artifact_store = Arc::new(ArtifactStore::new(&generated_dir)?);
    info!("ArtifactStore initialized at {}", artifact_store.root().display());

    let gemini_service = Arc::new(GeminiService::new(
        gemini_api_key,
        gemini_base_url,
        gemini_model,
    ));
    info!("GeminiService initialized");

    let mailer_config = match (sender_email, sender_password) {
        (Some(sender_email), Some(sender_password)) => Some(MailerConfig {
            smtp_server,
            smtp_port,
            sender_email,
            sender_password,
        }),
        _ => {
            warn!("SENDER_EMAIL/SENDER_PASSWORD not set; email sending disabled");
            None
        }
    };
    let mailer_service = Arc::new(MailerService::new(mailer_config));
    info!("MailerService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        gemini_service,
        mailer_service,
        artifact_store,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        // ====================================================================
        // ANALYSIS ROUTES (Upload, Analyze, Health)
        // ====================================================================
        .merge(analysis::analysis_routes())
        // ====================================================================
        // DOCUMENT ROUTES (Resume and Cover Letter Generation)
        // ====================================================================
        .merge(documents::documents_routes())
        // ====================================================================
        // EMAIL ROUTES (Application Dispatch)
        // ====================================================================
        .merge(email::email_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(Extension(shared.clone()))
        .layer({
            // Get CORS origins from environment variable
            let cors_origins = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5173".to_string()
            });

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE])
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
