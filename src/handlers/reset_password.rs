use axum::extract::Extension;
use axum::Json;
use log::{error, info, warn};
use std::sync::Arc;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{ResetPasswordRequest, ResetPasswordResponse};
use crate::t24::T24Client;
use crate::tokens::TokenStore;

/// Reset a T24 user's password to a generated value (`PUT /api/reset-password`).
///
/// Returns the new plaintext password, the upstream response, and a fresh
/// session token. Unlike the account lookup, the gateway error message is
/// surfaced in the 500 body.
pub async fn reset_password(
    _user: AuthenticatedUser,
    Extension(t24): Extension<Arc<T24Client>>,
    Extension(tokens): Extension<Arc<TokenStore>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    let user_id = payload
        .user_id
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            warn!("reset_password: missing userId");
            AppError::BadRequest("userId is required".to_string())
        })?;
    info!("PUT /api/reset-password: userId={}", user_id);

    let (new_password, t24_response) = match t24.reset_password(user_id).await {
        Ok(result) => result,
        Err(e) => {
            error!("reset_password: {}", e);
            return Err(AppError::InternalError(e.to_string()));
        }
    };

    let token = tokens.issue(user_id).map_err(|e| {
        error!("reset_password: failed to sign token: {}", e);
        AppError::InternalError("Failed to generate token".to_string())
    })?;

    info!("reset_password: password reset for userId={}", user_id);
    Ok(Json(ResetPasswordResponse {
        message: format!("Password reset for {}", user_id),
        new_password,
        t24_response,
        token,
    }))
}
