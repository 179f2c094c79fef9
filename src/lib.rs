//! Portal Auth - authentication core for the job portal
//!
//! This library provides password hashing, bearer token issuance and
//! verification, an authenticated-request gate and the HTTP endpoints
//! (register, login, current account) built on top of them.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod server;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
