use axum::extract::Extension;
use axum::Json;
use log::{error, info, warn};
use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse};
use crate::tokens::TokenStore;

/// Authenticate against the fixed credential list (`POST /api/login`).
///
/// On success, issues the first token of a rolling single-use session.
pub async fn login(
    Extension(credentials): Extension<Arc<CredentialStore>>,
    Extension(tokens): Extension<Arc<TokenStore>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            warn!("login: missing email");
            AppError::BadRequest("email and password are required".to_string())
        })?;
    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            warn!("login: missing password");
            AppError::BadRequest("email and password are required".to_string())
        })?;

    let cred = credentials.find(email, password).ok_or_else(|| {
        warn!("login: invalid credentials for email={}", email);
        AppError::Unauthorized
    })?;

    let token = tokens.issue(&cred.email).map_err(|e| {
        error!("login: failed to sign token: {}", e);
        AppError::InternalError("Failed to generate token".to_string())
    })?;

    info!("login: successful login for email={}", cred.email);
    Ok(Json(LoginResponse {
        login: cred.email.clone(),
        email: cred.email.clone(),
        token,
    }))
}
