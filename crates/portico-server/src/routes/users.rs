//! Current-user lookup and agent verification.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AuthClaims;
use crate::state::SharedState;

pub async fn current_user(
    State(state): State<SharedState>,
    AuthClaims(claims): AuthClaims,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.current_user(&claims).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn verify_agent(
    State(state): State<SharedState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.verify_agent(&claims, id).await?;
    Ok(Json(json!({ "user": user })))
}
