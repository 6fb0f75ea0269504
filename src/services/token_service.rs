use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::AuthError;
use crate::types::internal::SessionClaims;

/// Mints and validates the opaque session token handed to clients.
///
/// The token is a signed claim naming a session row; it carries no role or
/// permission data. Its expiry mirrors the session row's `expires_at`, so an
/// expired signature and an expired session are the same event.
pub struct TokenService {
    token_secret: String,
}

impl TokenService {
    pub fn new(token_secret: String) -> Self {
        Self { token_secret }
    }

    pub fn mint(&self, session_id: &str, expires_at: i64) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sid: session_id.to_owned(),
            iat: Utc::now().timestamp(),
            exp: expires_at,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.token_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal(format!("Failed to mint session token: {}", e)))
    }

    /// Resolve a token back to its session id.
    ///
    /// `SessionExpired` for an expired signature (the mirrored session expiry
    /// has passed), `Unauthenticated` for anything else.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.token_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::session_expired()
            } else {
                AuthError::unauthenticated()
            }
        })?;

        Ok(data.claims.sid)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    #[test]
    fn test_mint_and_validate_round_trip() {
        let service = TokenService::new(SECRET.to_string());
        let expires_at = Utc::now().timestamp() + 3600;

        let token = service.mint("session-123", expires_at).unwrap();
        let sid = service.validate(&token).unwrap();

        assert_eq!(sid, "session-123");
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let service = TokenService::new(SECRET.to_string());
        let other = TokenService::new("completely-different-secret-32-chars!".to_string());
        let token = service.mint("session-123", Utc::now().timestamp() + 3600).unwrap();

        let result = other.validate(&token);
        assert!(matches!(result, Err(AuthError::Unauthenticated(_))));
    }

    #[test]
    fn test_validate_maps_expired_signature_to_session_expired() {
        let service = TokenService::new(SECRET.to_string());
        let token = service
            .mint("session-123", Utc::now().timestamp() - 3600)
            .unwrap();

        let result = service.validate(&token);
        assert!(matches!(result, Err(AuthError::SessionExpired(_))));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let service = TokenService::new(SECRET.to_string());
        assert!(matches!(
            service.validate("not-a-token"),
            Err(AuthError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let service = TokenService::new(SECRET.to_string());
        let rendered = format!("{:?}", service);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
