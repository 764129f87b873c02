use axum::extract::{Extension, Query};
use axum::Json;
use log::{error, info, warn};
use std::sync::Arc;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{AccountsQuery, AccountsResponse};
use crate::t24::T24Client;
use crate::tokens::TokenStore;

/// Look up T24 accounts for an email (`GET /api/user?email=...`).
///
/// The bearer token has already been consumed by the extractor; a fresh one
/// is issued with the response. Upstream failure detail is logged, never
/// returned to the client.
pub async fn get_user(
    _user: AuthenticatedUser,
    Extension(t24): Extension<Arc<T24Client>>,
    Extension(tokens): Extension<Arc<TokenStore>>,
    Query(params): Query<AccountsQuery>,
) -> Result<Json<AccountsResponse>, AppError> {
    let email = params
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            warn!("get_user: missing email query parameter");
            AppError::BadRequest("email is required".to_string())
        })?;
    info!("GET /api/user: email={}", email);

    let users = match t24.fetch_accounts(email).await {
        Ok(users) => users,
        Err(e) => {
            error!("get_user: account lookup failed: {}", e);
            return Err(AppError::InternalError(
                "Failed to fetch accounts from T24".to_string(),
            ));
        }
    };

    let token = tokens.issue(email).map_err(|e| {
        error!("get_user: failed to sign token: {}", e);
        AppError::InternalError("Failed to generate token".to_string())
    })?;

    Ok(Json(AccountsResponse { users, token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[tokio::test]
    async fn test_missing_email_is_bad_request() {
        let config = load_config();
        let t24 = Arc::new(T24Client::new(reqwest::Client::new(), &config));
        let tokens = Arc::new(TokenStore::new("test-secret".to_string()));

        let result = get_user(
            AuthenticatedUser {
                sub: "msalifou@orangebank.ci".to_string(),
            },
            Extension(t24),
            Extension(tokens),
            Query(AccountsQuery { email: None }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
