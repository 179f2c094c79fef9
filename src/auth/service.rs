//! Registration, login and account lookup
//!
//! Every HTTP adapter goes through `AuthService`, so hashing and token
//! handling live in exactly one place.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::account::{normalize_email, Account, AccountProfile};
use crate::auth::gate::AuthContext;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenManager;
use crate::config::ServerConfig;
use crate::constants::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSWORD_BYTES};
use crate::error::{PortalError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::AccountStore;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub account: AccountProfile,
}

pub struct AuthService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenManager>,
    hasher: PasswordHasher,
    /// Verified against when the email is unknown, so both failure paths do
    /// the same work
    dummy_hash: String,
    min_login_duration: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenManager>,
        hasher: PasswordHasher,
        min_login_duration: Duration,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash(&uuid::Uuid::new_v4().to_string())?;
        Ok(Self {
            store,
            tokens,
            hasher,
            dummy_hash,
            min_login_duration,
        })
    }

    /// Build the service from startup configuration
    pub fn from_config(config: &ServerConfig, store: Arc<dyn AccountStore>) -> Result<Self> {
        Self::new(
            store,
            Arc::new(TokenManager::new(&config.jwt_secret)),
            PasswordHasher::new(config.hash_cost)?,
            config.auth_min_response,
        )
    }

    pub fn tokens(&self) -> Arc<TokenManager> {
        self.tokens.clone()
    }

    /// Create an account and return a token for it
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<String> {
        let email = validate_email(email)?;
        validate_password(password)?;
        let name = validate_name(name)?;

        if self.store.find_by_email(&email).await?.is_some() {
            log_security_event(&SecurityEvent::RegistrationConflict { email });
            return Err(PortalError::Conflict("account exists".to_string()));
        }

        let password_hash = self.hash_password(password.to_string()).await?;
        let account = Account::new(email.clone(), name, password_hash);
        let account_id = account.id.clone();

        // The store re-checks the email atomically; a concurrent registration
        // may have won the race since the lookup above
        if let Err(err) = self.store.insert(account).await {
            if let PortalError::Conflict(_) = err {
                log_security_event(&SecurityEvent::RegistrationConflict { email });
            }
            return Err(err);
        }

        log_security_event(&SecurityEvent::AccountRegistered {
            account_id: account_id.clone(),
        });
        self.tokens.issue(&account_id)
    }

    /// Check credentials and return a token plus the account projection.
    ///
    /// Unknown emails and wrong passwords both fail with `BadCredentials`
    /// after the same amount of hashing work and at least the configured
    /// minimum duration.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let timer = AuthTimer::new(self.min_login_duration);
        let result = self.check_credentials(email, password).await;
        timer.wait().await;
        result
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = normalize_email(email);
        if password.len() > MAX_PASSWORD_BYTES {
            log_security_event(&SecurityEvent::LoginFailed { email });
            return Err(PortalError::BadCredentials);
        }

        let account = self.store.find_by_email(&email).await?;
        let stored_hash = match &account {
            Some(account) => account.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let matches = self.verify_password(password.to_string(), stored_hash).await?;

        match account {
            Some(account) if matches => {
                let token = self.tokens.issue(&account.id)?;
                log_security_event(&SecurityEvent::LoginSucceeded {
                    account_id: account.id.clone(),
                });
                Ok(LoginOutcome {
                    token,
                    account: account.profile(),
                })
            }
            _ => {
                log_security_event(&SecurityEvent::LoginFailed { email });
                Err(PortalError::BadCredentials)
            }
        }
    }

    /// Account behind a verified request
    pub async fn current_account(&self, ctx: &AuthContext) -> Result<AccountProfile> {
        self.account_by_id(&ctx.subject_id).await
    }

    pub async fn account_by_id(&self, id: &str) -> Result<AccountProfile> {
        self.store
            .find_by_id(id)
            .await?
            .map(|account| account.profile())
            .ok_or_else(|| PortalError::NotFound("account".to_string()))
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    async fn verify_password(&self, password: String, stored_hash: String) -> Result<bool> {
        let hasher = self.hasher.clone();
        let matches =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash)).await?;
        Ok(matches)
    }
}

fn validate_email(email: &str) -> Result<String> {
    let email = normalize_email(email);
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(PortalError::ValidationError(format!(
            "email must be 1-{} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(PortalError::ValidationError(
            "email must not contain whitespace".to_string(),
        ));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(PortalError::ValidationError("invalid email format".to_string())),
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(PortalError::ValidationError(
            "password must not be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PortalError::ValidationError(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(PortalError::ValidationError(format!(
            "name must be 1-{} characters",
            MAX_NAME_LENGTH
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(PortalError::ValidationError(
            "name must not contain control characters".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryAccountStore;

    fn service() -> AuthService {
        AuthService::from_config(
            &ServerConfig::for_testing(),
            Arc::new(MemoryAccountStore::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_verifiable_token() {
        let service = service();
        let token = service.register("a@x.com", "pw1", "Ann").await.unwrap();
        let subject = service.tokens().verify(&token).unwrap();

        let profile = service.account_by_id(&subject).await.unwrap();
        assert_eq!(profile.email, "a@x.com");
        assert_eq!(profile.name, "Ann");
    }

    #[tokio::test]
    async fn test_scenario_register_login_conflict() {
        let service = service();
        let t1 = service.register("a@x.com", "pw1", "Ann").await.unwrap();
        let t2 = service.login("a@x.com", "pw1").await.unwrap();
        assert_eq!(
            service.tokens().verify(&t1).unwrap(),
            service.tokens().verify(&t2.token).unwrap()
        );
        assert_eq!(t2.account.name, "Ann");

        assert!(matches!(
            service.login("a@x.com", "wrong").await,
            Err(PortalError::BadCredentials)
        ));
        assert!(matches!(
            service.register("a@x.com", "pw2", "Ann2").await,
            Err(PortalError::Conflict(_))
        ));

        // The original record survives the conflicting registration
        let again = service.login("a@x.com", "pw1").await.unwrap();
        assert_eq!(again.account.name, "Ann");
        assert!(service.login("a@x.com", "pw2").await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_alike() {
        let service = service();
        service.register("a@x.com", "pw1", "Ann").await.unwrap();

        let unknown = service.login("nobody@x.com", "pw1").await.unwrap_err();
        let wrong = service.login("a@x.com", "nope").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.status_code(), wrong.status_code());
        assert_eq!(unknown.error_code(), wrong.error_code());
    }

    #[tokio::test]
    async fn test_email_is_normalised() {
        let service = service();
        service.register("  Ann@X.com", "pw1", "Ann").await.unwrap();
        assert!(service.login("ann@x.com", "pw1").await.is_ok());
        assert!(matches!(
            service.register("ANN@x.com", "pw9", "Other").await,
            Err(PortalError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = service();
        for (email, password, name) in [
            ("not-an-email", "pw1", "Ann"),
            ("@x.com", "pw1", "Ann"),
            ("a@", "pw1", "Ann"),
            ("a@b@c", "pw1", "Ann"),
            ("a b@x.com", "pw1", "Ann"),
            ("a@x.com", "", "Ann"),
            ("a@x.com", "pw1", "   "),
        ] {
            let result = service.register(email, password, name).await;
            assert!(
                matches!(result, Err(PortalError::ValidationError(_))),
                "{} / {} / {}",
                email,
                password,
                name
            );
        }

        let long_password = "p".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(service.register("a@x.com", &long_password, "Ann").await.is_err());
    }

    #[tokio::test]
    async fn test_current_account_for_missing_subject() {
        let service = service();
        let ctx = AuthContext {
            subject_id: "ghost".to_string(),
        };
        assert!(matches!(
            service.current_account(&ctx).await,
            Err(PortalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_login_respects_minimum_duration() {
        let mut config = ServerConfig::for_testing();
        config.auth_min_response = Duration::from_millis(30);
        let service =
            AuthService::from_config(&config, Arc::new(MemoryAccountStore::new())).unwrap();

        let start = std::time::Instant::now();
        let _ = service.login("nobody@x.com", "pw").await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_wrong_password_respects_minimum_duration() {
        let mut config = ServerConfig::for_testing();
        config.auth_min_response = Duration::from_millis(30);
        let service =
            AuthService::from_config(&config, Arc::new(MemoryAccountStore::new())).unwrap();
        service.register("a@x.com", "pw1", "Ann").await.unwrap();

        let start = std::time::Instant::now();
        let result = service.login("a@x.com", "wrong").await;
        assert!(matches!(result, Err(PortalError::BadCredentials)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
