//! The authenticated session and its token lifecycle.
//!
//! The session holds the bearer token returned by the backend together with
//! the expiry timestamp decoded from the token itself. It lives in memory
//! for the lifetime of the process and is never persisted. A single shared
//! slot is the one authority consulted both before sending a request and
//! when the backend answers 401, so the local state cannot silently diverge
//! from server-side validity.

use base64::Engine;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    /// Unix timestamp taken from the token `exp` claim.
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    MalformedToken,
    MissingExpiry,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::MalformedToken => write!(f, "Authentication token is malformed"),
            Self::MissingExpiry => write!(f, "Authentication token has no expiry claim"),
        }
    }
}

impl AuthSession {
    /// Builds a session from a raw token, rejecting tokens whose expiry
    /// cannot be decoded.
    pub fn new(token: String) -> Result<Self, SessionError> {
        let expires_at = decode_expiry(&token)?;
        Ok(Self { token, expires_at })
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

/// Decodes the `exp` claim of a JWT without verifying its signature.
/// Signature verification is the backend's job; the client only needs the
/// expiry to avoid sending requests bound to fail.
fn decode_expiry(token: &str) -> Result<i64, SessionError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or(SessionError::MalformedToken)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| SessionError::MalformedToken)?;
    let claims: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| SessionError::MalformedToken)?;
    claims
        .get("exp")
        .and_then(|v| v.as_i64())
        .ok_or(SessionError::MissingExpiry)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Crafts an unsigned JWT with the given `exp` claim.
    pub fn token_with_expiry(exp: i64) -> String {
        let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = engine.encode(format!(r#"{{"sub":"user-1","exp":{}}}"#, exp));
        format!("{}.{}.", header, payload)
    }

    #[test]
    fn expiry_is_decoded_from_the_token() {
        let session = AuthSession::new(token_with_expiry(1_900_000_000)).unwrap();
        assert_eq!(session.expires_at, 1_900_000_000);
        assert!(!session.is_expired_at(1_899_999_999));
        assert!(session.is_expired_at(1_900_000_000));
        assert!(session.is_expired_at(1_900_000_001));
    }

    #[test]
    fn token_without_expiry_is_rejected() {
        let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(br#"{"alg":"none"}"#);
        let payload = engine.encode(br#"{"sub":"user-1"}"#);
        assert_eq!(
            AuthSession::new(format!("{}.{}.", header, payload)),
            Err(SessionError::MissingExpiry)
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(
            AuthSession::new("not-a-jwt".to_string()),
            Err(SessionError::MalformedToken)
        );
        assert_eq!(
            AuthSession::new("a.!!!!.c".to_string()),
            Err(SessionError::MalformedToken)
        );
    }
}
