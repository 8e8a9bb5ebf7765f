//! Route table and router assembly.

mod auth;
mod communications;
mod health;
mod listings;
mod users;
mod webhooks;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/user", get(users::current_user))
        .route("/api/verify-agent/{id}", post(users::verify_agent))
        .route(
            "/api/listings",
            get(listings::list).post(listings::create),
        )
        .route("/api/listings/{id}", get(listings::get_by_id))
        .route("/api/communications", post(communications::request))
        .route(
            "/api/communications/email",
            post(communications::email_inquiry),
        )
        .route("/api/twilio-webhook", post(webhooks::twilio))
        .route("/api/sendgrid-webhook", post(webhooks::sendgrid))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
