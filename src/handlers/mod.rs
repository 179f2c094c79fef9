//! Request handlers for the HTTP endpoints

pub mod auth;
pub mod rejection;

pub use rejection::handle_rejection;
