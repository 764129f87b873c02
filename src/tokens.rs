use crate::constants::SESSION_TOKEN_TTL_SECS;
use crate::models::Claims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// No token was supplied with the request.
    Missing,
    /// The token is not in the active registry, or its signature or expiry
    /// failed validation.
    InvalidOrExpired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Missing => write!(f, "Missing token"),
            TokenError::InvalidOrExpired => write!(f, "Invalid or expired token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues signed session tokens and enforces single use.
///
/// The registry holds every issued-but-unconsumed token value. Membership is
/// necessary but not sufficient for validity: the signature and expiry are
/// checked as well. Expired-but-unconsumed values stay in the registry until a
/// verification attempt removes them or the process restarts.
pub struct TokenStore {
    secret: String,
    registry: Mutex<HashSet<String>>,
}

impl TokenStore {
    pub fn new(secret: String) -> Self {
        TokenStore {
            secret,
            registry: Mutex::new(HashSet::new()),
        }
    }

    /// Sign a new 5-minute token for `sub` and add it to the active registry.
    pub fn issue(&self, sub: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: sub.to_string(),
            iat: now,
            exp: now + SESSION_TOKEN_TTL_SECS,
            jti: format!("{:016x}", rand::thread_rng().gen::<u64>()),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        self.registry
            .lock()
            .expect("token registry lock poisoned")
            .insert(token.clone());

        Ok(token)
    }

    /// Validate a presented token and consume it.
    ///
    /// The registry removal happens first and is the single linearization
    /// point: of two racing calls presenting the same value, only the first
    /// observes it present. Presenting a token consumes it even when the
    /// signature or expiry check then fails.
    pub fn verify_and_consume(&self, token: Option<&str>) -> Result<Claims, TokenError> {
        let token = token.ok_or(TokenError::Missing)?;

        let was_active = self
            .registry
            .lock()
            .expect("token registry lock poisoned")
            .remove(token);
        if !was_active {
            return Err(TokenError::InvalidOrExpired);
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| TokenError::InvalidOrExpired)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    fn store() -> TokenStore {
        TokenStore::new(TEST_SECRET.to_string())
    }

    #[test]
    fn test_issued_token_validates_once() {
        let store = store();
        let token = store.issue("msalifou@orangebank.ci").expect("issue failed");

        let claims = store
            .verify_and_consume(Some(&token))
            .expect("first use should succeed");
        assert_eq!(claims.sub, "msalifou@orangebank.ci");
    }

    #[test]
    fn test_second_use_rejected() {
        let store = store();
        let token = store.issue("msalifou@orangebank.ci").expect("issue failed");

        store
            .verify_and_consume(Some(&token))
            .expect("first use should succeed");
        assert_eq!(
            store.verify_and_consume(Some(&token)),
            Err(TokenError::InvalidOrExpired)
        );
    }

    #[test]
    fn test_missing_token_rejected() {
        let store = store();
        assert_eq!(store.verify_and_consume(None), Err(TokenError::Missing));
    }

    #[test]
    fn test_unregistered_token_rejected() {
        let store = store();
        // Well-formed and correctly signed, but never issued by this store.
        let other = TokenStore::new(TEST_SECRET.to_string());
        let token = other.issue("msalifou@orangebank.ci").expect("issue failed");

        assert_eq!(
            store.verify_and_consume(Some(&token)),
            Err(TokenError::InvalidOrExpired)
        );
    }

    #[test]
    fn test_expired_registered_token_rejected_and_removed() {
        let store = store();
        let claims = Claims {
            sub: "msalifou@orangebank.ci".to_string(),
            iat: 1000,
            exp: 1001,
            jti: "0000000000000000".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode failed");
        store
            .registry
            .lock()
            .expect("lock")
            .insert(token.clone());

        assert_eq!(
            store.verify_and_consume(Some(&token)),
            Err(TokenError::InvalidOrExpired)
        );
        // The verification attempt consumed the expired value.
        assert!(!store.registry.lock().expect("lock").contains(&token));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let store = store();
        let forged = TokenStore::new("some-other-secret".to_string())
            .issue("msalifou@orangebank.ci")
            .expect("issue failed");
        store
            .registry
            .lock()
            .expect("lock")
            .insert(forged.clone());

        assert_eq!(
            store.verify_and_consume(Some(&forged)),
            Err(TokenError::InvalidOrExpired)
        );
    }

    #[test]
    fn test_rolling_session() {
        let store = store();
        let t1 = store.issue("msalifou@orangebank.ci").expect("issue failed");

        let claims = store
            .verify_and_consume(Some(&t1))
            .expect("T1 should authorize the first call");
        let t2 = store.issue(&claims.sub).expect("issue failed");

        assert_eq!(
            store.verify_and_consume(Some(&t1)),
            Err(TokenError::InvalidOrExpired)
        );
        store
            .verify_and_consume(Some(&t2))
            .expect("T2 should still be valid");
    }

    #[test]
    fn test_back_to_back_issues_are_distinct() {
        let store = store();
        let t1 = store.issue("msalifou@orangebank.ci").expect("issue failed");
        let t2 = store.issue("msalifou@orangebank.ci").expect("issue failed");
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_concurrent_consume_single_winner() {
        let store = Arc::new(store());
        let token = store.issue("msalifou@orangebank.ci").expect("issue failed");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let token = token.clone();
                std::thread::spawn(move || store.verify_and_consume(Some(&token)).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }
}
