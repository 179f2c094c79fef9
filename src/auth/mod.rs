//! Authentication and authorization module

pub mod account;
pub mod gate;
pub mod password;
pub mod service;
pub mod token;

// Re-export main components
pub use account::{Account, AccountProfile};
pub use gate::{authenticate, with_auth, AuthContext};
pub use password::{HashCost, PasswordHasher};
pub use service::{AuthService, LoginOutcome};
pub use token::{Claims, TokenManager};
