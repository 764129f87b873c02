use serde::{Deserialize, Serialize};

// ── JWT Claims ─────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    /// Random token id; keeps same-second tokens for one subject distinct.
    pub jti: String,
}

// ── Login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub login: String,
    pub email: String,
    pub token: String,
}

// ── Account lookup ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AccountsQuery {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct AccountsResponse {
    pub users: Vec<serde_json::Value>,
    pub token: String,
}

// ── Password reset ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
    #[serde(rename = "t24Response")]
    pub t24_response: serde_json::Value,
    pub token: String,
}

// ── Next page ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NextPageResponse {
    pub token: String,
    pub info: String,
}

// ── Version ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub build_date: &'static str,
    pub rustc_version: &'static str,
}

// ── Health ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub tunnel: String,
}
