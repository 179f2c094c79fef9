//! Authenticated-request gate
//!
//! `with_auth` is a warp filter placed in front of a protected handler:
//!
//! ```rust,ignore
//! let me = warp::path!("api" / "auth" / "me")
//!     .and(with_auth(tokens.clone()))
//!     .and_then(handle_me);
//! ```
//!
//! Requests without a usable bearer token are rejected before the handler
//! runs. The gate never touches the account store; turning the subject into
//! an account is the handler's job.

use std::convert::Infallible;
use std::sync::Arc;

use warp::http::header::{HeaderMap, AUTHORIZATION};
use warp::{Filter, Rejection};

use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::constants::MAX_TOKEN_LENGTH;
use crate::error::{PortalError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};

/// Request-scoped identity attached by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Verified subject identifier from the token
    pub subject_id: String,
}

/// Resolve the caller's identity from request headers
pub fn authenticate(headers: &HeaderMap, tokens: &TokenManager) -> Result<AuthContext> {
    let raw = match headers.get(AUTHORIZATION) {
        Some(value) => value,
        None => return Err(PortalError::MissingToken),
    };

    let raw = raw.to_str().map_err(|_| PortalError::InvalidToken)?;
    if raw.trim().is_empty() {
        return Err(PortalError::MissingToken);
    }

    let token = extract_bearer_token(raw).ok_or(PortalError::InvalidToken)?;
    if token.len() > MAX_TOKEN_LENGTH || token.chars().any(char::is_control) {
        return Err(PortalError::InvalidToken);
    }

    let subject_id = tokens.verify(token)?;
    Ok(AuthContext { subject_id })
}

/// Filter yielding the caller's `AuthContext` or rejecting with 401
pub fn with_auth(
    tokens: Arc<TokenManager>,
) -> impl Filter<Extract = (AuthContext,), Error = Rejection> + Clone {
    warp::header::headers_cloned()
        .and(with_tokens(tokens))
        .and_then(gate)
}

fn with_tokens(
    tokens: Arc<TokenManager>,
) -> impl Filter<Extract = (Arc<TokenManager>,), Error = Infallible> + Clone {
    warp::any().map(move || tokens.clone())
}

async fn gate(
    headers: HeaderMap,
    tokens: Arc<TokenManager>,
) -> std::result::Result<AuthContext, Rejection> {
    authenticate(&headers, &tokens).map_err(|err| {
        match err {
            PortalError::MissingToken => log_security_event(&SecurityEvent::TokenMissing),
            _ => log_security_event(&SecurityEvent::TokenRejected),
        }
        warp::reject::custom(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::HeaderValue;

    const SECRET: &str = "gate-unit-tests-key-3e8d1f0a-77bc";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_is_missing_token() {
        let tokens = TokenManager::new(SECRET);
        let result = authenticate(&HeaderMap::new(), &tokens);
        assert!(matches!(result, Err(PortalError::MissingToken)));

        let result = authenticate(&headers_with("   "), &tokens);
        assert!(matches!(result, Err(PortalError::MissingToken)));
    }

    #[test]
    fn test_valid_bearer_yields_subject() {
        let tokens = TokenManager::new(SECRET);
        let token = tokens.issue("acct-7").unwrap();
        let ctx = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap();
        assert_eq!(ctx.subject_id, "acct-7");
    }

    #[test]
    fn test_wrong_scheme_or_garbage_is_invalid() {
        let tokens = TokenManager::new(SECRET);
        let token = tokens.issue("acct-7").unwrap();

        for value in [
            token.clone(),
            format!("Basic {}", token),
            "Bearer not-a-jwt".to_string(),
            format!("Bearer {}", "a".repeat(MAX_TOKEN_LENGTH + 1)),
        ] {
            let result = authenticate(&headers_with(&value), &tokens);
            assert!(matches!(result, Err(PortalError::InvalidToken)), "{}", value);
        }
    }

    #[tokio::test]
    async fn test_filter_extracts_context() {
        let tokens = Arc::new(TokenManager::new(SECRET));
        let token = tokens.issue("acct-9").unwrap();

        let ctx = warp::test::request()
            .header("authorization", format!("Bearer {}", token))
            .filter(&with_auth(tokens.clone()))
            .await
            .unwrap();
        assert_eq!(ctx.subject_id, "acct-9");

        let rejected = warp::test::request().filter(&with_auth(tokens)).await;
        assert!(rejected.is_err());
    }
}
