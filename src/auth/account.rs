use serde::{Deserialize, Serialize};

/// A registered portal account
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique, stable account identifier
    pub id: String,
    /// Normalised email, unique across accounts
    pub email: String,
    /// Name shown in the portal
    pub name: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Account creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Account {
    /// Creates a new account with a generated identifier
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            password_hash,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile::from(self)
    }
}

/// What clients get to see of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            name: account.name.clone(),
        }
    }
}

/// Canonical form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
