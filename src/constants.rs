/// Session token time-to-live: 5 minutes in seconds.
pub const SESSION_TOKEN_TTL_SECS: usize = 5 * 60;

/// Length of a generated reset password.
pub const RESET_PASSWORD_LENGTH: usize = 8;

/// Alphabet for generated reset passwords.
pub const RESET_PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default number of tunnel discovery polling rounds before giving up.
pub const DEFAULT_TUNNEL_MAX_ATTEMPTS: u32 = 10;

/// Default delay between tunnel discovery polling rounds, in milliseconds.
pub const DEFAULT_TUNNEL_RETRY_DELAY_MS: u64 = 1000;

/// Default HTTP client timeout in seconds.
pub const DEFAULT_HTTP_CLIENT_TIMEOUT_SECS: u64 = 30;

/// T24 path for account lookup by technical user. The technical user id is
/// appended as the final path segment; the target email goes in the `Email`
/// query parameter.
pub const T24_ACCOUNT_LOOKUP_PATH: &str = "/OBAMobApi/api/v1.0.0/party/user/userId";

/// T24 path for password reset. The current millisecond timestamp is appended
/// as the final path segment.
pub const T24_PASSWORD_RESET_PATH: &str = "/OBAMobApi/api/v1.0.0/party/user/passwordreset";
