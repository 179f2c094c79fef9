use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::{BEARER_PREFIX, TOKEN_TTL_SECS};
use crate::error::{PortalError, Result};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued at (as UTC timestamp)
    pub iat: u64,
    /// Expiration time (as UTC timestamp)
    pub exp: u64,
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

impl Claims {
    /// Creates claims for an account, expiring after the fixed token lifetime
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self::issued_at(subject_id, now_secs())
    }

    /// Creates claims as if issued at `iat`
    pub fn issued_at(subject_id: impl Into<String>, iat: u64) -> Self {
        Self {
            sub: subject_id.into(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }
}

/// Signs and verifies bearer tokens with the single process-wide secret
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenManager {
    /// Creates a new token manager with a secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token whose only payload claim is the subject
    pub fn issue(&self, subject_id: &str) -> Result<String> {
        self.generate_token(&Claims::new(subject_id))
    }

    /// Generates a JWT token for the given claims
    pub fn generate_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| PortalError::TokenError(format!("Failed to generate token: {}", e)))
    }

    /// Validates a token and returns its subject.
    ///
    /// Every failure (bad signature, malformed input, expiry) is reported as
    /// the same `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            log::debug!("Token rejected: {:?}", e.kind());
            PortalError::InvalidToken
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(PortalError::InvalidToken);
        }

        Ok(claims.sub)
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "token-unit-tests-key-7f2c9a1b-44de";

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let manager = TokenManager::new(SECRET);
        let token = manager.issue("acct-42").unwrap();
        assert_eq!(manager.verify(&token).unwrap(), "acct-42");
    }

    #[test]
    fn test_claims_expire_after_seven_days() {
        let claims = Claims::issued_at("acct-42", 1_000);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let manager = TokenManager::new(SECRET);
        let iat = now_secs() - TOKEN_TTL_SECS - 10;
        let token = manager.generate_token(&Claims::issued_at("acct-42", iat)).unwrap();
        assert!(matches!(manager.verify(&token), Err(PortalError::InvalidToken)));
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let ours = TokenManager::new(SECRET);
        let theirs = TokenManager::new("some-other-signing-key-9b8a7c6d5e");
        let token = theirs.issue("acct-42").unwrap();
        assert!(matches!(ours.verify(&token), Err(PortalError::InvalidToken)));
    }

    #[test]
    fn test_malformed_and_truncated_tokens_are_invalid() {
        let manager = TokenManager::new(SECRET);
        let token = manager.issue("acct-42").unwrap();
        let truncated = &token[..token.len() - 5];

        for bad in ["", "garbage", "a.b.c", truncated] {
            assert!(matches!(manager.verify(bad), Err(PortalError::InvalidToken)));
        }
    }

    #[test]
    fn test_failures_share_one_message() {
        let manager = TokenManager::new(SECRET);
        let expired = manager
            .generate_token(&Claims::issued_at("acct-42", 0))
            .unwrap();
        let forged = TokenManager::new("forged-signing-key-aa11bb22cc33dd44")
            .issue("acct-42")
            .unwrap();

        let messages: Vec<String> = [expired.as_str(), forged.as_str(), "junk"]
            .iter()
            .map(|t| manager.verify(t).unwrap_err().to_string())
            .collect();
        assert!(messages.iter().all(|m| m == &messages[0]));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }
}
