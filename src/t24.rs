use crate::config::Config;
use crate::constants::{
    RESET_PASSWORD_ALPHABET, RESET_PASSWORD_LENGTH, T24_ACCOUNT_LOOKUP_PATH,
    T24_PASSWORD_RESET_PATH,
};
use crate::tunnel::{self, DiscoveryExhausted};
use log::debug;
use rand::Rng;
use std::time::Duration;

#[derive(Debug)]
pub enum T24Error {
    Discovery(DiscoveryExhausted),
    RequestFailed(String),
    UpstreamStatus { status: u16, body: String },
    InvalidResponse(String),
}

impl std::fmt::Display for T24Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            T24Error::Discovery(e) => write!(f, "Tunnel discovery failed: {}", e),
            T24Error::RequestFailed(msg) => write!(f, "T24 request failed: {}", msg),
            T24Error::UpstreamStatus { status, body } => {
                write!(f, "T24 returned HTTP {}: {}", status, body)
            }
            T24Error::InvalidResponse(msg) => write!(f, "Invalid T24 response: {}", msg),
        }
    }
}

impl std::error::Error for T24Error {}

impl From<DiscoveryExhausted> for T24Error {
    fn from(e: DiscoveryExhausted) -> Self {
        T24Error::Discovery(e)
    }
}

/// Client for the T24 core-banking API behind the local tunnel.
///
/// The base URL is re-resolved through tunnel discovery on every call; both
/// operations authenticate with the fixed technical user via HTTP Basic.
pub struct T24Client {
    http: reqwest::Client,
    user: String,
    pass: String,
    tunnel_api_url: String,
    tunnel_max_attempts: u32,
    tunnel_retry_delay: Duration,
}

impl T24Client {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        T24Client {
            http,
            user: config.t24_user.clone(),
            pass: config.t24_pass.clone(),
            tunnel_api_url: config.tunnel_api_url.clone(),
            tunnel_max_attempts: config.tunnel_max_attempts,
            tunnel_retry_delay: Duration::from_millis(config.tunnel_retry_delay_ms),
        }
    }

    async fn base_url(&self) -> Result<String, T24Error> {
        let base = tunnel::resolve_base_url(
            &self.http,
            &self.tunnel_api_url,
            self.tunnel_max_attempts,
            self.tunnel_retry_delay,
        )
        .await?;
        Ok(base)
    }

    /// Single-round discovery probe used by the health endpoint.
    pub async fn probe_tunnel(&self) -> Result<String, DiscoveryExhausted> {
        tunnel::resolve_base_url(&self.http, &self.tunnel_api_url, 1, Duration::from_millis(0))
            .await
    }

    /// Look up the accounts visible to the technical user for `email`.
    ///
    /// The body is read as text first so that non-JSON error payloads surface
    /// their raw content in the error. The `body` field of the parsed response
    /// is the account list, defaulting to empty when absent.
    pub async fn fetch_accounts(&self, email: &str) -> Result<Vec<serde_json::Value>, T24Error> {
        let base = self.base_url().await?;
        let url = format!(
            "{}{}/{}",
            base.trim_end_matches('/'),
            T24_ACCOUNT_LOOKUP_PATH,
            self.user
        );
        debug!("t24: account lookup for email={} via {}", email, url);

        let response = self
            .http
            .get(&url)
            .query(&[("Email", email)])
            .header("Accept", "application/json")
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await
            .map_err(|e| T24Error::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| T24Error::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(T24Error::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| T24Error::InvalidResponse(e.to_string()))?;
        let accounts = data
            .get("body")
            .and_then(|body| body.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(accounts)
    }

    /// Reset the T24 password for `user_login` to a freshly generated value.
    ///
    /// Returns the generated plaintext password together with the upstream
    /// JSON response.
    pub async fn reset_password(
        &self,
        user_login: &str,
    ) -> Result<(String, serde_json::Value), T24Error> {
        let new_password = generate_password();

        let base = self.base_url().await?;
        let timestamp = chrono::Utc::now().timestamp_millis();
        let url = format!(
            "{}{}/{}",
            base.trim_end_matches('/'),
            T24_PASSWORD_RESET_PATH,
            timestamp
        );
        debug!("t24: password reset for userlogin={} via {}", user_login, url);

        let payload = serde_json::json!({
            "body": {
                "userlogin": user_login,
                "userPassword": new_password,
            }
        });

        let response = self
            .http
            .put(&url)
            .json(&payload)
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await
            .map_err(|e| T24Error::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| T24Error::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(T24Error::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| T24Error::InvalidResponse(e.to_string()))?;
        Ok((new_password, data))
    }
}

/// Generate an 8-character alphanumeric password with no two adjacent
/// characters equal. On a repeat, only the candidate character is
/// regenerated, never the whole string.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let mut password = String::with_capacity(RESET_PASSWORD_LENGTH);

    while password.len() < RESET_PASSWORD_LENGTH {
        let candidate = RESET_PASSWORD_ALPHABET[rng.gen_range(0..RESET_PASSWORD_ALPHABET.len())];
        if password.as_bytes().last() == Some(&candidate) {
            continue;
        }
        password.push(candidate as char);
    }

    password
}
