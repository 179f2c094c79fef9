// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;

// Token policy
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const BEARER_PREFIX: &str = "Bearer ";
pub const MAX_TOKEN_LENGTH: usize = 2048;

// Request limits
pub const MAX_BODY_BYTES: u64 = 16 * 1024;
pub const MAX_PASSWORD_BYTES: usize = 1024;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 100;

// Minimum time a login attempt takes, success or failure
pub const DEFAULT_AUTH_MIN_RESPONSE_MS: u64 = 100;

// Secrets shorter than this are refused at startup
pub const MIN_SECRET_LENGTH: usize = 32;
