//! Portico Communications — the inquiry-to-agent contact broker.
//!
//! Given a requester, a listing, and a contact channel, this crate
//! resolves the owning agent, provisions a channel-appropriate
//! virtual contact address, dispatches the outbound contact via the
//! telephony/messaging or email provider, and records a communication
//! with a lifecycle status. Webhook callbacks from the providers feed
//! back into the same records.

pub mod config;
pub mod error;
pub mod provider;
pub mod sendgrid;
pub mod service;
pub mod twilio;
pub mod webhook;

pub use config::CommsConfig;
pub use error::CommsError;
pub use provider::{
    DispatchReceipt, EmailProvider, MessagingProvider, OutboundCall, OutboundEmail,
    OutboundMessage,
};
pub use sendgrid::SendGridClient;
pub use service::{CommsService, CommunicationReceipt, CommunicationRequest, EmailInquiry, Requester};
pub use twilio::TwilioClient;
pub use webhook::{CallbackOutcome, ProviderCallback, twiml_message_response};
