use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use viko_api::middleware::require_auth;
use viko_api::{AppState, AppStateInner, chat, profile, push, translate, ws};
use viko_push::{Notifier, SubscriptionRepo, VapidSender};
use viko_store::Store;
use viko_translate::Translator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viko=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let supabase_url =
        std::env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
    let service_key =
        std::env::var("SUPABASE_SERVICE_KEY").context("SUPABASE_SERVICE_KEY must be set")?;
    let gemini_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    let vapid_public = std::env::var("VAPID_PUBLIC_KEY").unwrap_or_default();
    let vapid_private = std::env::var("VAPID_PRIVATE_KEY").unwrap_or_default();
    let vapid_subject =
        std::env::var("VAPID_SUBJECT").unwrap_or_else(|_| "mailto:push@viko.app".into());
    let host = std::env::var("VIKO_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VIKO_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let allowed_origins =
        std::env::var("VIKO_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into());

    if gemini_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; sends will fall back to untranslated");
    }
    if vapid_private.is_empty() || vapid_public.is_empty() {
        warn!("VAPID keys are not set; push delivery will fail and be skipped");
    }

    // Collaborator clients
    let store = Arc::new(Store::new(&supabase_url, &service_key)?);
    let translator = Translator::new(gemini_key)?;
    let wire = Arc::new(VapidSender::new(vapid_private, vapid_subject));
    let notifier = Notifier::new(store.clone() as Arc<dyn SubscriptionRepo>, wire);

    let state: AppState = Arc::new(AppStateInner {
        store,
        translator,
        notifier,
        vapid_public_key: vapid_public,
    });

    // Routes
    let public_routes = Router::new()
        .route("/api/translate", post(translate::translate))
        .route("/api/detect-language", post(translate::detect_language))
        .route(
            "/api/conversations",
            get(chat::get_conversations).post(chat::create_conversation),
        )
        .route("/api/conversations/{id}/messages", get(chat::get_messages))
        .route("/api/messages", post(chat::send_message))
        .route("/api/push/vapid-key", get(push::vapid_key))
        .route("/api/ws/chat", get(ws::ws_chat))
        .route("/health", get(health))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route(
            "/api/auth/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route("/api/auth/search", get(profile::search_users))
        .route("/api/push/subscribe", post(push::subscribe))
        .route("/api/push/unsubscribe", delete(push::unsubscribe))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("viko server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Credentialed CORS for the configured web origins; credentials rule out a
/// wildcard.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
