//! Communication domain model.
//!
//! A communication record tracks one inquiry-to-agent contact attempt
//! across its lifecycle. Records are append-mostly: after creation
//! only the `status` field changes, driven by provider webhooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact channel for a communication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommunicationChannel {
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "chat-message")]
    ChatMessage,
    #[serde(rename = "email")]
    Email,
}

impl CommunicationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationChannel::Call => "call",
            CommunicationChannel::ChatMessage => "chat-message",
            CommunicationChannel::Email => "email",
        }
    }

    /// Parse from the wire/storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call" => Some(CommunicationChannel::Call),
            "chat-message" => Some(CommunicationChannel::ChatMessage),
            "email" => Some(CommunicationChannel::Email),
            _ => None,
        }
    }
}

/// Canonical lifecycle statuses. The column itself is free-form:
/// webhook ingress records provider-reported states
/// (`ringing`, `completed`, `undelivered`, ...) verbatim.
pub mod status {
    /// Outbound record written, dispatch pending or in flight.
    pub const INITIATED: &str = "initiated";
    /// Terminal status for outbound email (no async callback).
    pub const SENT: &str = "sent";
    /// Inbound-originated records start here.
    pub const RECEIVED: &str = "received";
    pub const DELIVERED: &str = "delivered";
    pub const FAILED: &str = "failed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Communication {
    pub id: Uuid,
    /// Absent for inbound chat replies, which cannot name a listing.
    pub listing_id: Option<Uuid>,
    /// The inquirer. Absent for inbound records from unknown senders.
    pub user_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub channel: CommunicationChannel,
    pub status: String,
    /// Shared outbound phone number (call/chat) or per-listing email
    /// alias (email). Shields the agent's real contact details.
    pub virtual_address: Option<String>,
    /// The inquirer's effective reply address.
    pub contact_email: Option<String>,
    /// Free-text body for email inquiries and inbound replies.
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunication {
    pub listing_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub channel: CommunicationChannel,
    pub status: String,
    pub virtual_address: Option<String>,
    pub contact_email: Option<String>,
    pub message: Option<String>,
}
