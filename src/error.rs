use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug)]
pub enum PortalError {
    // Credential errors
    BadCredentials,
    Conflict(String),

    // Token errors
    MissingToken,
    InvalidToken,

    // Request errors
    ValidationError(String),
    NotFound(String),

    // Server faults
    StorageError(String),
    HashingError(String),
    TokenError(String),
    ConfigError(String),
    SystemError(String),
}

impl PortalError {
    /// True for failures the caller cannot fix; their detail stays server-side.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::StorageError(_)
                | Self::HashingError(_)
                | Self::TokenError(_)
                | Self::ConfigError(_)
                | Self::SystemError(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadCredentials | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code sent alongside the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadCredentials => "bad_credentials",
            Self::Conflict(_) => "conflict",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::ValidationError(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            _ => "server_fault",
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        if self.is_server_fault() {
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadCredentials => write!(f, "invalid credentials"),
            Self::Conflict(msg) => write!(f, "{}", msg),
            Self::MissingToken => write!(f, "unauthorized, token missing"),
            Self::InvalidToken => write!(f, "unauthorized, invalid or expired token"),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::NotFound(what) => write!(f, "{} not found", what),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::HashingError(msg) => write!(f, "Password hashing error: {}", msg),
            Self::TokenError(msg) => write!(f, "Token error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl Error for PortalError {}

impl warp::reject::Reject for PortalError {}

// Blocking hash tasks that panic or get cancelled surface as system faults
impl From<tokio::task::JoinError> for PortalError {
    fn from(err: tokio::task::JoinError) -> Self {
        PortalError::SystemError(format!("Background task failed: {}", err))
    }
}

// Generic result type for the portal
pub type Result<T> = std::result::Result<T, PortalError>;
