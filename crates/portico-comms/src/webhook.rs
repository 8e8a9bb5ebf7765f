//! Webhook ingress — asynchronous provider callbacks.
//!
//! Status updates match communication records by the
//! (virtual address, channel) pair; no provider identifier is stored,
//! so concurrent outstanding calls to the shared number cannot be
//! disambiguated. Business-logic misses (no matching row, unknown
//! sender) are no-ops reported as success so the provider does not
//! retry them.

use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::communication::{
    CommunicationChannel, CreateCommunication, status,
};
use portico_core::repository::{
    CommunicationRepository, ListingRepository, UserRepository,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::provider::{EmailProvider, MessagingProvider};
use crate::service::CommsService;

/// Telephony/messaging provider callback payload (form-encoded).
///
/// One payload shape serves three event kinds: call status events,
/// message status events, and inbound messages. Field presence
/// decides which it is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderCallback {
    pub call_sid: Option<String>,
    pub call_status: Option<String>,
    pub message_sid: Option<String>,
    pub message_status: Option<String>,
    pub body: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// What the ingress did with a callback.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// A status event was applied to `updated` matching records
    /// (zero is a valid no-op).
    StatusRecorded {
        channel: CommunicationChannel,
        updated: u64,
    },
    /// An inbound message was persisted; `reply` is the
    /// acknowledgment to send back through the same channel.
    InboundRecorded {
        communication_id: Uuid,
        reply: String,
    },
    /// Nothing actionable in the payload.
    Ignored,
}

/// Render a TwiML response carrying a single reply message.
pub fn twiml_message_response(body: &str) -> String {
    let escaped = body
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Response><Message>{escaped}</Message></Response>"
    )
}

/// Extract the listing id from a per-listing alias address
/// (`agent-<listingId>@<domain>`).
fn listing_id_from_alias(address: &str) -> Option<Uuid> {
    let local = address.split('@').next()?;
    let id = local.strip_prefix("agent-")?;
    Uuid::parse_str(id).ok()
}

impl<L, U, C, M, E> CommsService<L, U, C, M, E>
where
    L: ListingRepository,
    U: UserRepository,
    C: CommunicationRepository,
    M: MessagingProvider,
    E: EmailProvider,
{
    /// Apply a telephony/messaging provider callback.
    ///
    /// Never fails on business-logic misses: the provider should only
    /// retry transport failures.
    pub async fn handle_provider_callback(
        &self,
        payload: ProviderCallback,
    ) -> PorticoResult<CallbackOutcome> {
        // Call status event.
        if let (Some(call_status), Some(to)) = (&payload.call_status, &payload.to) {
            let updated = self
                .communications
                .update_status_by_address(to, CommunicationChannel::Call, call_status)
                .await?;
            info!(
                sid = ?payload.call_sid,
                to = %to,
                status = %call_status,
                updated,
                "call status recorded"
            );
            return Ok(CallbackOutcome::StatusRecorded {
                channel: CommunicationChannel::Call,
                updated,
            });
        }

        // Message status event.
        if let (Some(message_status), Some(to)) = (&payload.message_status, &payload.to) {
            let updated = self
                .communications
                .update_status_by_address(to, CommunicationChannel::ChatMessage, message_status)
                .await?;
            info!(
                sid = ?payload.message_sid,
                to = %to,
                status = %message_status,
                updated,
                "message status recorded"
            );
            return Ok(CallbackOutcome::StatusRecorded {
                channel: CommunicationChannel::ChatMessage,
                updated,
            });
        }

        // Inbound message: body + sender, no status fields.
        if let (Some(body), Some(from)) = (payload.body.clone(), payload.from.clone()) {
            return self.record_inbound_message(body, from, payload.to).await;
        }

        warn!("provider callback carried no actionable fields");
        Ok(CallbackOutcome::Ignored)
    }

    async fn record_inbound_message(
        &self,
        body: String,
        from: String,
        to: Option<String>,
    ) -> PorticoResult<CallbackOutcome> {
        // Resolve the sender by stored phone number. An unknown
        // sender is a logged no-op, not an error: the webhook still
        // reports success to the provider.
        let user = match self.users.get_by_phone(&from).await {
            Ok(user) => user,
            Err(PorticoError::NotFound { .. }) => {
                warn!(from = %from, "inbound message from unknown number");
                return Ok(CallbackOutcome::Ignored);
            }
            Err(e) => return Err(e),
        };

        let record = self
            .communications
            .create(CreateCommunication {
                listing_id: None,
                user_id: Some(user.id),
                agent_id: None,
                channel: CommunicationChannel::ChatMessage,
                status: status::RECEIVED.into(),
                virtual_address: to,
                contact_email: Some(user.email.clone()),
                message: Some(body),
            })
            .await?;

        info!(communication = %record.id, user = %user.id, "inbound message recorded");

        Ok(CallbackOutcome::InboundRecorded {
            communication_id: record.id,
            reply: "Your message has been received. An agent will get back to you shortly."
                .into(),
        })
    }

    /// Apply an inbound-email callback (email provider parse
    /// webhook). The listing is resolved through the per-listing
    /// alias; unresolvable aliases are logged no-ops.
    pub async fn handle_inbound_email(
        &self,
        from: &str,
        to: &str,
        text: &str,
    ) -> PorticoResult<Option<Uuid>> {
        let Some(listing_id) = listing_id_from_alias(to) else {
            warn!(to = %to, "inbound email to unrecognized alias");
            return Ok(None);
        };

        let listing = match self.listings.get_by_id(listing_id).await {
            Ok(listing) => listing,
            Err(PorticoError::NotFound { .. }) => {
                warn!(to = %to, "inbound email alias names no listing");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let record = self
            .communications
            .create(CreateCommunication {
                listing_id: Some(listing.id),
                user_id: None,
                agent_id: Some(listing.agent_id),
                channel: CommunicationChannel::Email,
                status: status::RECEIVED.into(),
                virtual_address: Some(self.listing_alias(listing.id)),
                contact_email: Some(from.to_string()),
                message: Some(text.to_string()),
            })
            .await?;

        info!(communication = %record.id, listing = %listing.id, "inbound email recorded");
        Ok(Some(record.id))
    }
}
