//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in
//! `portico-db`; services in `portico-auth` and `portico-comms` are
//! generic over these traits so they carry no database dependency.

use uuid::Uuid;

use crate::error::PorticoResult;
use crate::models::{
    communication::{Communication, CommunicationChannel, CreateCommunication},
    listing::{CreateListing, Listing, ListingFilter},
    user::{CreateUser, User},
};

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = PorticoResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PorticoResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = PorticoResult<User>> + Send;
    fn get_by_phone(&self, phone: &str) -> impl Future<Output = PorticoResult<User>> + Send;
    /// Set `verified = true` on an agent. Fails with `NotFound` if no
    /// row with that id has role agent.
    fn mark_agent_verified(&self, id: Uuid) -> impl Future<Output = PorticoResult<User>> + Send;
}

pub trait ListingRepository: Send + Sync {
    fn create(&self, input: CreateListing) -> impl Future<Output = PorticoResult<Listing>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PorticoResult<Listing>> + Send;
    fn list(
        &self,
        filter: ListingFilter,
    ) -> impl Future<Output = PorticoResult<Vec<Listing>>> + Send;
}

pub trait CommunicationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCommunication,
    ) -> impl Future<Output = PorticoResult<Communication>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PorticoResult<Communication>> + Send;
    /// Transition a single record's status. Used for channels whose
    /// terminal state is known within the originating request
    /// (outbound email).
    fn update_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> impl Future<Output = PorticoResult<Communication>> + Send;
    /// Update the status of all records matching the
    /// (virtual address, channel) pair. Returns the number of rows
    /// affected — zero is a valid outcome, not an error.
    fn update_status_by_address(
        &self,
        virtual_address: &str,
        channel: CommunicationChannel,
        status: &str,
    ) -> impl Future<Output = PorticoResult<u64>> + Send;
}
