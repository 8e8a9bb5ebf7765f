//! SurrealDB repository implementations.

mod communication;
mod listing;
mod user;

pub use communication::SurrealCommunicationRepository;
pub use listing::SurrealListingRepository;
pub use user::{SurrealUserRepository, verify_password};
