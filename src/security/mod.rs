//! Security utilities and middleware

pub mod headers;
pub mod timing;

pub use headers::api_security_headers;
pub use timing::AuthTimer;
