use crate::error::AppError;
use crate::tokens::{TokenError, TokenStore};
use axum::extract::{Extension, FromRequest, RequestParts};
use std::sync::Arc;

/// Represents an authenticated caller extracted from a valid single-use
/// session token.
///
/// Extraction consumes the presented token: the caller must use the fresh
/// token returned by the handler to authorize its next request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub sub: String,
}

#[axum::async_trait]
impl<B> FromRequest<B> for AuthenticatedUser
where
    B: Send,
{
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        // Extract the token store from extensions
        let Extension(tokens) = Extension::<Arc<TokenStore>>::from_request(req)
            .await
            .map_err(|_| AppError::InternalError("Token store not configured".to_string()))?;

        // Expect "Bearer <token>" in the Authorization header
        let token = req
            .headers()
            .and_then(|headers| headers.get("Authorization"))
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let claims = tokens.verify_and_consume(token).map_err(|e| match e {
            TokenError::Missing => AppError::Forbidden,
            TokenError::InvalidOrExpired => AppError::Unauthorized,
        })?;

        Ok(AuthenticatedUser { sub: claims.sub })
    }
}
