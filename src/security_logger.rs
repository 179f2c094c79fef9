//! Security-focused logging of authentication events
//!
//! Events are written under the `security` log target so they can be routed
//! or filtered separately (`RUST_LOG=security=info`). Passwords and tokens
//! are never part of an event.

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    AccountRegistered { account_id: String },
    RegistrationConflict { email: String },
    LoginSucceeded { account_id: String },
    LoginFailed { email: String },
    TokenMissing,
    TokenRejected,
    ServerFault { context: String, error: String },
}

impl SecurityEvent {
    /// Stable short key for the event kind
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AccountRegistered { .. } => "account_registered",
            SecurityEvent::RegistrationConflict { .. } => "registration_conflict",
            SecurityEvent::LoginSucceeded { .. } => "login_succeeded",
            SecurityEvent::LoginFailed { .. } => "login_failed",
            SecurityEvent::TokenMissing => "token_missing",
            SecurityEvent::TokenRejected => "token_rejected",
            SecurityEvent::ServerFault { .. } => "server_fault",
        }
    }
}

/// Log a security event, tagged with its key
pub fn log_security_event(event: &SecurityEvent) {
    let key = event.key();
    match event {
        SecurityEvent::AccountRegistered { account_id } => {
            log::info!(target: "security", "SECURITY[{}]: Account registered - Account: {}", key, account_id);
        }
        SecurityEvent::RegistrationConflict { email } => {
            log::warn!(target: "security", "SECURITY[{}]: Registration for existing email - Email: {}", key, email);
        }
        SecurityEvent::LoginSucceeded { account_id } => {
            log::info!(target: "security", "SECURITY[{}]: Authentication success - Account: {}", key, account_id);
        }
        SecurityEvent::LoginFailed { email } => {
            log::warn!(target: "security", "SECURITY[{}]: Authentication failed - Email: {}", key, email);
        }
        SecurityEvent::TokenMissing => {
            log::debug!(target: "security", "SECURITY[{}]: Request without bearer token rejected", key);
        }
        SecurityEvent::TokenRejected => {
            log::warn!(target: "security", "SECURITY[{}]: Invalid or expired bearer token rejected", key);
        }
        SecurityEvent::ServerFault { context, error } => {
            log::error!(target: "security", "SECURITY[{}]: Server fault - Context: {}, Error: {}", key, context, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_keys_are_distinct() {
        let events = [
            SecurityEvent::AccountRegistered { account_id: "a".into() },
            SecurityEvent::RegistrationConflict { email: "e".into() },
            SecurityEvent::LoginSucceeded { account_id: "a".into() },
            SecurityEvent::LoginFailed { email: "e".into() },
            SecurityEvent::TokenMissing,
            SecurityEvent::TokenRejected,
            SecurityEvent::ServerFault { context: "c".into(), error: "e".into() },
        ];
        let mut keys: Vec<&str> = events.iter().map(SecurityEvent::key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), events.len());

        // Logging without an installed logger must be a no-op
        for event in &events {
            log_security_event(event);
        }
    }
}
