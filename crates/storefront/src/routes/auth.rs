//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Registration form.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login form.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Success envelope for auth endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Register a new account.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    state
        .auth()
        .register(&form.username, &form.email, &form.password)
        .await
        .map_err(|e| AppError::from_auth(e, "Error registering user"))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully!",
            access_token: None,
        }),
    ))
}

/// Log in and receive an access token.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let token = state
        .auth()
        .login(&form.email, &form.password)
        .await
        .map_err(|e| AppError::from_auth(e, "Error logging in user"))?;

    Ok(Json(AuthResponse {
        success: true,
        message: "User successfully logged in!",
        access_token: Some(token),
    }))
}
