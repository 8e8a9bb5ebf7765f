//! Registration and login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use portico_auth::{LoginInput, RegisterInput};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::SharedState;

/// Fields are optional at the wire level so that missing values
/// surface as 400 validation errors, not deserialization rejections.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

pub async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    let output = state
        .auth
        .register(RegisterInput {
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
            role: body.role.unwrap_or_default(),
            phone: body.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": output.token, "user": output.user })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError(portico_core::PorticoError::Validation {
            message: "email and password are required".into(),
        }));
    };

    let output = state.auth.login(LoginInput { email, password }).await?;

    Ok(Json(json!({ "token": output.token, "user": output.user })))
}
