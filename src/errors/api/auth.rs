use crate::errors::internal::{InternalError, UserError};
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response body for all endpoints
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication and session errors
///
/// These short-circuit the request; the client renders the message and
/// typically redirects to login. Raw internal errors never leak through.
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// No session token, or the token does not resolve to a session
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// The session's expiry has passed
    #[oai(status = 401)]
    SessionExpired(Json<ErrorResponse>),

    /// The session was explicitly revoked
    #[oai(status = 401)]
    SessionRevoked(Json<ErrorResponse>),

    /// Wrong email/password combination
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Input shape or constraint violation
    #[oai(status = 422)]
    ValidationFailed(Json<ErrorResponse>),

    /// Duplicate email or similar uniqueness violation
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl AuthError {
    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(ErrorResponse {
            error: "unauthenticated".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    pub fn session_expired() -> Self {
        AuthError::SessionExpired(Json(ErrorResponse {
            error: "session_expired".to_string(),
            message: "Session has expired, please sign in again".to_string(),
            status_code: 401,
        }))
    }

    pub fn session_revoked() -> Self {
        AuthError::SessionRevoked(Json(ErrorResponse {
            error: "session_revoked".to_string(),
            message: "Session has been revoked".to_string(),
            status_code: 401,
        }))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        AuthError::ValidationFailed(Json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: message.into(),
            status_code: 422,
        }))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AuthError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
        }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AuthError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }

    pub fn message(&self) -> String {
        match self {
            AuthError::Unauthenticated(json)
            | AuthError::SessionExpired(json)
            | AuthError::SessionRevoked(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::ValidationFailed(json)
            | AuthError::Conflict(json)
            | AuthError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        match err {
            // Credential misses collapse into one response so the API does not
            // reveal whether the email exists
            InternalError::User(UserError::EmailNotFound { .. })
            | InternalError::User(UserError::IncorrectPassword { .. }) => {
                AuthError::invalid_credentials()
            }
            InternalError::User(UserError::EmailTaken { email }) => {
                AuthError::conflict(format!("Email already registered: {}", email))
            }
            InternalError::User(UserError::Suspended { .. }) => {
                AuthError::validation_failed("Account is suspended")
            }
            InternalError::User(UserError::NotApproved { .. }) => {
                AuthError::validation_failed("Account is awaiting approval")
            }
            InternalError::Session(_) => AuthError::unauthenticated(),
            other => {
                tracing::error!("Internal error surfaced to auth API: {:?}", other);
                AuthError::internal("An internal error occurred".to_string())
            }
        }
    }
}
