//! Process-scoped application state.
//!
//! All clients (database, providers) are constructed once at startup
//! and shared by reference; handlers never construct their own.

use std::sync::Arc;

use portico_auth::AuthService;
use portico_comms::{CommsService, SendGridClient, TwilioClient};
use portico_db::DbManager;
use portico_db::repository::{
    SurrealCommunicationRepository, SurrealListingRepository, SurrealUserRepository,
};
use surrealdb::engine::remote::ws::Client;

pub type UserRepo = SurrealUserRepository<Client>;
pub type ListingRepo = SurrealListingRepository<Client>;
pub type CommunicationRepo = SurrealCommunicationRepository<Client>;

pub struct AppState {
    pub db: DbManager,
    pub auth: AuthService<UserRepo>,
    pub comms: CommsService<ListingRepo, UserRepo, CommunicationRepo, TwilioClient, SendGridClient>,
    pub listings: ListingRepo,
}

pub type SharedState = Arc<AppState>;
