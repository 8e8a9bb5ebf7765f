//! Portico Server — application entry point.

mod config;
mod error;
mod extract;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use portico_auth::AuthService;
use portico_comms::{CommsService, SendGridClient, TwilioClient};
use portico_db::DbManager;
use portico_db::repository::{
    SurrealCommunicationRepository, SurrealListingRepository, SurrealUserRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "portico=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting portico server");

    dotenv::dotenv().ok();
    let config = ServerConfig::from_env()?;

    let db = DbManager::connect(&config.db).await?;
    portico_db::run_migrations(db.client()).await?;

    let user_repo = match config.auth.pepper.clone() {
        Some(pepper) => SurrealUserRepository::with_pepper(db.client().clone(), pepper),
        None => SurrealUserRepository::new(db.client().clone()),
    };
    let listing_repo = SurrealListingRepository::new(db.client().clone());
    let communication_repo = SurrealCommunicationRepository::new(db.client().clone());

    let twilio = TwilioClient::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
    );
    let sendgrid = SendGridClient::new(config.sendgrid_api_key.clone());

    let auth = AuthService::new(user_repo.clone(), config.auth.clone());
    let comms = CommsService::new(
        listing_repo.clone(),
        user_repo,
        communication_repo,
        twilio,
        sendgrid,
        config.comms.clone(),
    );

    let state = Arc::new(AppState {
        db,
        auth,
        comms,
        listings: listing_repo,
    });

    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
