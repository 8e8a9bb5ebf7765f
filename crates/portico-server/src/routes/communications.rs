//! Communication brokering endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use portico_comms::{CommunicationRequest, EmailInquiry, Requester};
use portico_core::PorticoError;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AuthClaims;
use crate::state::SharedState;

fn requester(claims: &portico_auth::SessionClaims) -> Result<Requester, ApiError> {
    Ok(Requester {
        id: claims.user_id()?,
        email: claims.email.clone(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationBody {
    #[serde(default, rename = "type")]
    channel: Option<String>,
    #[serde(default)]
    listing_id: Option<Uuid>,
    /// Preferred reply address; defaults to the caller's own email.
    #[serde(default)]
    user_email: Option<String>,
}

pub async fn request(
    State(state): State<SharedState>,
    AuthClaims(claims): AuthClaims,
    Json(body): Json<CommunicationBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(channel), Some(listing_id)) = (body.channel, body.listing_id) else {
        return Err(ApiError(PorticoError::Validation {
            message: "type and listingId are required".into(),
        }));
    };

    let receipt = state
        .comms
        .request_communication(
            &requester(&claims)?,
            CommunicationRequest {
                channel,
                listing_id,
                contact_email: body.user_email,
            },
        )
        .await?;

    Ok(Json(json!({
        "virtualNumber": receipt.virtual_address,
        "communicationId": receipt.communication_id,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailInquiryBody {
    #[serde(default)]
    listing_id: Option<Uuid>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub async fn email_inquiry(
    State(state): State<SharedState>,
    AuthClaims(claims): AuthClaims,
    Json(body): Json<EmailInquiryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(listing_id) = body.listing_id else {
        return Err(ApiError(PorticoError::Validation {
            message: "listingId is required".into(),
        }));
    };

    let communication_id = state
        .comms
        .request_email_inquiry(
            &requester(&claims)?,
            EmailInquiry {
                listing_id,
                name: body.name.unwrap_or_default(),
                email: body.email.unwrap_or_default(),
                message: body.message.unwrap_or_default(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "communicationId": communication_id })),
    ))
}
