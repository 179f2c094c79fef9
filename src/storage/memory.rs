//! In-memory account storage for development and testing

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::AccountStore;
use crate::auth::account::Account;
use crate::error::{PortalError, Result};

#[derive(Default)]
struct Accounts {
    by_id: HashMap<String, Account>,
    id_by_email: HashMap<String, String>,
}

/// In-memory account storage
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Accounts>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .id_by_email
            .get(email)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.by_id.get(id).cloned())
    }

    async fn insert(&self, account: Account) -> Result<()> {
        // Check and insert under one write lock so concurrent registrations
        // cannot both claim the same email
        let mut accounts = self.accounts.write().await;

        if accounts.id_by_email.contains_key(&account.email) {
            return Err(PortalError::Conflict("account exists".to_string()));
        }
        if accounts.by_id.contains_key(&account.id) {
            return Err(PortalError::StorageError(format!(
                "Duplicate account id: {}",
                account.id
            )));
        }

        accounts
            .id_by_email
            .insert(account.email.clone(), account.id.clone());
        accounts.by_id.insert(account.id.clone(), account);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.accounts.read().await.by_id.len())
    }
}
