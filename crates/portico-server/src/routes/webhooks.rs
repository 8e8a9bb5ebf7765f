//! Webhook ingress — unauthenticated entry points invoked by the
//! providers. Business-logic misses still answer 200 so the provider
//! only retries transport failures.

use axum::extract::{Form, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use portico_comms::{CallbackOutcome, ProviderCallback, twiml_message_response};
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::SharedState;

/// Telephony/messaging provider callback (form-encoded).
pub async fn twilio(
    State(state): State<SharedState>,
    Form(payload): Form<ProviderCallback>,
) -> Result<Response, ApiError> {
    let outcome = state.comms.handle_provider_callback(payload).await?;

    let response = match outcome {
        // Inbound chat gets a synthesized acknowledgment, delivered
        // as TwiML in the HTTP response.
        CallbackOutcome::InboundRecorded { reply, .. } => (
            [(CONTENT_TYPE, "text/xml")],
            twiml_message_response(&reply),
        )
            .into_response(),
        CallbackOutcome::StatusRecorded { .. } | CallbackOutcome::Ignored => {
            "Webhook received".into_response()
        }
    };
    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct SendGridInbound {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Email provider inbound-parse callback.
pub async fn sendgrid(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<SendGridInbound>,
) -> Result<&'static str, ApiError> {
    match (payload.from, payload.to) {
        (Some(from), Some(to)) => {
            state
                .comms
                .handle_inbound_email(&from, &to, payload.text.as_deref().unwrap_or_default())
                .await?;
        }
        _ => warn!("inbound email callback missing from/to"),
    }
    Ok("Webhook received")
}
