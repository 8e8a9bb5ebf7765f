//! Provider trait definitions for the outbound SaaS collaborators.
//!
//! The communications service is generic over these traits so the
//! brokering logic can be exercised against recording mocks; the
//! production implementations ([`crate::TwilioClient`],
//! [`crate::SendGridClient`]) talk to the real REST APIs.

use crate::error::CommsError;

/// An outbound call to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    pub to: String,
    pub from: String,
    /// URL the provider posts asynchronous status events to.
    pub status_callback: Option<String>,
}

/// An outbound chat message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub from: String,
    pub body: String,
    pub status_callback: Option<String>,
}

/// An outbound transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    /// Virtual alias the recipient replies to, shielding the
    /// inquirer's real address from the wire `From`.
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Provider-side receipt for a dispatched call or message.
///
/// The identifier is logged for traceability but never persisted:
/// webhook matching is by (virtual address, channel).
#[derive(Debug, Clone, Default)]
pub struct DispatchReceipt {
    pub provider_id: Option<String>,
}

/// Telephony/messaging collaborator (calls + chat messages).
pub trait MessagingProvider: Send + Sync {
    fn place_call(
        &self,
        call: OutboundCall,
    ) -> impl Future<Output = Result<DispatchReceipt, CommsError>> + Send;

    fn send_message(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<DispatchReceipt, CommsError>> + Send;
}

/// Transactional email collaborator. Fire-and-forget: no status
/// callback is consumed for outbound email.
pub trait EmailProvider: Send + Sync {
    fn send_email(
        &self,
        email: OutboundEmail,
    ) -> impl Future<Output = Result<(), CommsError>> + Send;
}
