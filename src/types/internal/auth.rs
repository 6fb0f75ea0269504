use serde::{Deserialize, Serialize};

/// Claims carried by the opaque session token.
///
/// The token only names a session row; everything else (role, grants, status)
/// is re-read from the store on every request so revocation is immediately
/// visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session id the token resolves to
    pub sid: String,
    pub iat: i64,
    /// Mirrors the session row's expires_at
    pub exp: i64,
}
