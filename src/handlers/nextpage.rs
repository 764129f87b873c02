use axum::extract::Extension;
use axum::Json;
use log::{debug, error};
use std::sync::Arc;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::NextPageResponse;
use crate::tokens::TokenStore;

/// Rotate the session token with no other business logic (`GET /api/nextpage`).
pub async fn nextpage(
    user: AuthenticatedUser,
    Extension(tokens): Extension<Arc<TokenStore>>,
) -> Result<Json<NextPageResponse>, AppError> {
    debug!("GET /api/nextpage: sub={}", user.sub);

    let token = tokens.issue(&user.sub).map_err(|e| {
        error!("nextpage: failed to sign token: {}", e);
        AppError::InternalError("Failed to generate token".to_string())
    })?;

    Ok(Json(NextPageResponse {
        token,
        info: "Next page accessible".to_string(),
    }))
}
