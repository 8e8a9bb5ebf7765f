//! Communication brokering service.
//!
//! The record is always written before the outbound dispatch is
//! attempted: a crash or provider failure mid-dispatch leaves a
//! record permanently at `initiated`, which callers can observe.
//! Nothing is retried.

use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::communication::{
    CommunicationChannel, CreateCommunication, status,
};
use portico_core::models::listing::Listing;
use portico_core::models::user::{User, UserRole};
use portico_core::repository::{
    CommunicationRepository, ListingRepository, UserRepository,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::CommsConfig;
use crate::error::CommsError;
use crate::provider::{
    EmailProvider, MessagingProvider, OutboundCall, OutboundEmail, OutboundMessage,
};

/// The authenticated inquirer on whose behalf a contact is brokered.
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: Uuid,
    pub email: String,
}

/// Input for [`CommsService::request_communication`]. `channel` is the
/// raw wire value and is validated here.
#[derive(Debug)]
pub struct CommunicationRequest {
    pub channel: String,
    pub listing_id: Uuid,
    /// Preferred reply address; defaults to the requester's email.
    pub contact_email: Option<String>,
}

/// Input for [`CommsService::request_email_inquiry`]: the inquirer
/// supplies their identity inline.
#[derive(Debug)]
pub struct EmailInquiry {
    pub listing_id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Result of a brokered contact request.
#[derive(Debug)]
pub struct CommunicationReceipt {
    /// The provisioned virtual contact address, if any.
    pub virtual_address: Option<String>,
    pub communication_id: Uuid,
}

/// Communication brokering service.
///
/// Generic over repositories and providers so the brokering logic
/// carries no database or HTTP dependency.
pub struct CommsService<L, U, C, M, E>
where
    L: ListingRepository,
    U: UserRepository,
    C: CommunicationRepository,
    M: MessagingProvider,
    E: EmailProvider,
{
    pub(crate) listings: L,
    pub(crate) users: U,
    pub(crate) communications: C,
    messaging: M,
    email: E,
    pub(crate) config: CommsConfig,
}

impl<L, U, C, M, E> CommsService<L, U, C, M, E>
where
    L: ListingRepository,
    U: UserRepository,
    C: CommunicationRepository,
    M: MessagingProvider,
    E: EmailProvider,
{
    pub fn new(
        listings: L,
        users: U,
        communications: C,
        messaging: M,
        email: E,
        config: CommsConfig,
    ) -> Self {
        Self {
            listings,
            users,
            communications,
            messaging,
            email,
            config,
        }
    }

    /// Per-listing email alias shielding the agent's real address.
    pub(crate) fn listing_alias(&self, listing_id: Uuid) -> String {
        format!("agent-{listing_id}@{}", self.config.email_domain)
    }

    /// Resolve a listing and its owning agent, modelling the
    /// referential integrity the schema does not enforce: the agent
    /// row must exist and actually have role agent.
    async fn resolve_listing_and_agent(
        &self,
        listing_id: Uuid,
    ) -> PorticoResult<(Listing, User)> {
        let listing = self.listings.get_by_id(listing_id).await?;
        let agent = self.users.get_by_id(listing.agent_id).await?;
        if agent.role != UserRole::Agent {
            return Err(PorticoError::NotFound {
                entity: "agent".into(),
                id: listing.agent_id.to_string(),
            });
        }
        Ok((listing, agent))
    }

    /// Broker a contact from the requester to the listing's agent.
    ///
    /// The communication record is persisted at `initiated` before
    /// dispatch. Outbound email has no async callback and therefore
    /// transitions to `sent` within this call; call and chat records
    /// stay `initiated` until the provider webhook reports progress.
    pub async fn request_communication(
        &self,
        requester: &Requester,
        request: CommunicationRequest,
    ) -> PorticoResult<CommunicationReceipt> {
        let channel = CommunicationChannel::parse(&request.channel).ok_or_else(|| {
            PorticoError::Validation {
                message: format!("invalid communication type: {}", request.channel),
            }
        })?;

        let (listing, agent) = self.resolve_listing_and_agent(request.listing_id).await?;

        let contact_email = request
            .contact_email
            .unwrap_or_else(|| requester.email.clone());

        let virtual_address = match channel {
            CommunicationChannel::Call | CommunicationChannel::ChatMessage => {
                self.config.phone_number.clone()
            }
            CommunicationChannel::Email => self.listing_alias(listing.id),
        };

        let record = self
            .communications
            .create(CreateCommunication {
                listing_id: Some(listing.id),
                user_id: Some(requester.id),
                agent_id: Some(agent.id),
                channel,
                status: status::INITIATED.into(),
                virtual_address: Some(virtual_address.clone()),
                contact_email: Some(contact_email.clone()),
                message: None,
            })
            .await?;

        info!(
            communication = %record.id,
            listing = %listing.id,
            channel = channel.as_str(),
            "communication record created, dispatching"
        );

        match channel {
            CommunicationChannel::Call => {
                let to = agent.phone.clone().ok_or(CommsError::AgentPhoneMissing)?;
                self.messaging
                    .place_call(OutboundCall {
                        to,
                        from: self.config.phone_number.clone(),
                        status_callback: self.config.status_callback_url.clone(),
                    })
                    .await
                    .map_err(|e| self.dispatch_failed(record.id, e))?;
            }
            CommunicationChannel::ChatMessage => {
                let to = agent.phone.clone().ok_or(CommsError::AgentPhoneMissing)?;
                self.messaging
                    .send_message(OutboundMessage {
                        to,
                        from: self.config.phone_number.clone(),
                        body: format!(
                            "New chat-message request for listing: {} from {}",
                            listing.title, contact_email
                        ),
                        status_callback: self.config.status_callback_url.clone(),
                    })
                    .await
                    .map_err(|e| self.dispatch_failed(record.id, e))?;
            }
            CommunicationChannel::Email => {
                self.email
                    .send_email(OutboundEmail {
                        to: agent.email.clone(),
                        from: self.config.email_from.clone(),
                        reply_to: Some(virtual_address.clone()),
                        subject: format!("New inquiry for {}", listing.title),
                        body: format!(
                            "User {} is interested in your listing: {}.",
                            contact_email, listing.title
                        ),
                    })
                    .await
                    .map_err(|e| self.dispatch_failed(record.id, e))?;

                // No async callback for email: terminal within this
                // request.
                self.communications
                    .update_status(record.id, status::SENT)
                    .await?;
            }
        }

        Ok(CommunicationReceipt {
            virtual_address: Some(virtual_address),
            communication_id: record.id,
        })
    }

    /// Broker a free-text email inquiry where the inquirer supplies
    /// their own name and reply address inline.
    pub async fn request_email_inquiry(
        &self,
        requester: &Requester,
        inquiry: EmailInquiry,
    ) -> PorticoResult<Uuid> {
        if inquiry.email.is_empty() || inquiry.message.is_empty() {
            return Err(PorticoError::Validation {
                message: "email and message are required".into(),
            });
        }

        let (listing, agent) = self.resolve_listing_and_agent(inquiry.listing_id).await?;
        let alias = self.listing_alias(listing.id);

        let record = self
            .communications
            .create(CreateCommunication {
                listing_id: Some(listing.id),
                user_id: Some(requester.id),
                agent_id: Some(agent.id),
                channel: CommunicationChannel::Email,
                status: status::INITIATED.into(),
                virtual_address: Some(alias.clone()),
                contact_email: Some(inquiry.email.clone()),
                message: Some(inquiry.message.clone()),
            })
            .await?;

        self.email
            .send_email(OutboundEmail {
                to: agent.email.clone(),
                from: self.config.email_from.clone(),
                reply_to: Some(alias),
                subject: format!("New inquiry for {}", listing.title),
                body: format!(
                    "From: {} ({})\nMessage: {}\nListing: {}",
                    inquiry.name, inquiry.email, inquiry.message, listing.title
                ),
            })
            .await
            .map_err(|e| self.dispatch_failed(record.id, e))?;

        self.communications
            .update_status(record.id, status::SENT)
            .await?;

        Ok(record.id)
    }

    /// Log a dispatch failure and convert it. The record stays in
    /// whatever state it reached; callers see it exists but it may
    /// never progress past `initiated`.
    fn dispatch_failed(&self, communication_id: Uuid, err: CommsError) -> PorticoError {
        error!(
            communication = %communication_id,
            error = %err,
            "outbound dispatch failed"
        );
        err.into()
    }
}
