//! Abstract account storage interface
//!
//! The account store is owned by the surrounding platform; this crate only
//! needs lookups by email and id plus an insert that refuses duplicate emails.

use async_trait::async_trait;

use crate::auth::account::Account;
use crate::error::Result;

/// Account record storage
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by normalised email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Look up an account by identifier
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// Insert a new account.
    ///
    /// Fails with `PortalError::Conflict` when the email is already taken,
    /// leaving the existing record untouched.
    async fn insert(&self, account: Account) -> Result<()>;

    /// Number of stored accounts
    async fn count(&self) -> Result<usize>;
}
