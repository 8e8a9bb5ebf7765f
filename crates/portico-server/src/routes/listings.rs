//! Listing creation and retrieval.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use portico_core::PorticoError;
use portico_core::models::listing::{CreateListing, ListingFilter};
use portico_core::models::user::UserRole;
use portico_core::repository::ListingRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AuthClaims;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    price_max: Option<f64>,
    location: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state
        .listings
        .list(ListingFilter {
            price_max: query.price_max,
            location: query.location,
        })
        .await?;
    Ok(Json(listings))
}

pub async fn get_by_id(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.listings.get_by_id(id).await?;
    Ok(Json(listing))
}

#[derive(Debug, Deserialize)]
pub struct CreateListingBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Only verified agents may publish listings.
fn ensure_verified_agent(claims: &portico_auth::SessionClaims) -> Result<(), ApiError> {
    if claims.role != UserRole::Agent || !claims.verified {
        return Err(ApiError(PorticoError::AuthorizationDenied {
            reason: "only a verified agent may create listings".into(),
        }));
    }
    Ok(())
}

pub async fn create(
    State(state): State<SharedState>,
    AuthClaims(claims): AuthClaims,
    Json(body): Json<CreateListingBody>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_verified_agent(&claims)?;

    let (Some(title), Some(price), Some(location)) = (body.title, body.price, body.location)
    else {
        return Err(ApiError(PorticoError::Validation {
            message: "title, price, and location are required".into(),
        }));
    };

    let listing = state
        .listings
        .create(CreateListing {
            title,
            price,
            location,
            description: body.description.unwrap_or_default(),
            agent_id: claims.user_id()?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(listing)))
}
