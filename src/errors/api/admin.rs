use crate::errors::api::auth::{AuthError, ErrorResponse};
use crate::errors::internal::{AccessError, InternalError, UserError};
use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

/// Administration endpoint errors (user management, access management)
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// No valid session
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// The session's expiry has passed
    #[oai(status = 401)]
    SessionExpired(Json<ErrorResponse>),

    /// The session was explicitly revoked
    #[oai(status = 401)]
    SessionRevoked(Json<ErrorResponse>),

    /// Authorization evaluator denial
    #[oai(status = 403)]
    InsufficientPermission(Json<ErrorResponse>),

    /// Entity lookup miss
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Input shape or business-rule violation
    #[oai(status = 422)]
    ValidationFailed(Json<ErrorResponse>),

    /// Uniqueness violation (duplicate access row, duplicate email)
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl AdminError {
    pub fn unauthenticated() -> Self {
        AdminError::Unauthenticated(Json(ErrorResponse {
            error: "unauthenticated".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    pub fn session_expired() -> Self {
        AdminError::SessionExpired(Json(ErrorResponse {
            error: "session_expired".to_string(),
            message: "Session has expired, please sign in again".to_string(),
            status_code: 401,
        }))
    }

    pub fn session_revoked() -> Self {
        AdminError::SessionRevoked(Json(ErrorResponse {
            error: "session_revoked".to_string(),
            message: "Session has been revoked".to_string(),
            status_code: 401,
        }))
    }

    pub fn insufficient_permission() -> Self {
        AdminError::InsufficientPermission(Json(ErrorResponse {
            error: "insufficient_permission".to_string(),
            message: "You do not have permission to perform this action".to_string(),
            status_code: 403,
        }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AdminError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        AdminError::ValidationFailed(Json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: message.into(),
            status_code: 422,
        }))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AdminError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
        }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AdminError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }

    pub fn message(&self) -> String {
        match self {
            AdminError::Unauthenticated(json)
            | AdminError::SessionExpired(json)
            | AdminError::SessionRevoked(json)
            | AdminError::InsufficientPermission(json)
            | AdminError::NotFound(json)
            | AdminError::ValidationFailed(json)
            | AdminError::Conflict(json)
            | AdminError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Session-validation outcomes keep their variant when an admin endpoint
/// rejects the bearer token; everything else is a plain 401.
impl From<AuthError> for AdminError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SessionExpired(_) => AdminError::session_expired(),
            AuthError::SessionRevoked(_) => AdminError::session_revoked(),
            _ => AdminError::unauthenticated(),
        }
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::User(UserError::NotFound { user_id }) => {
                AdminError::not_found(format!("User not found: {}", user_id))
            }
            InternalError::User(UserError::EmailTaken { email }) => {
                AdminError::conflict(format!("Email already registered: {}", email))
            }
            InternalError::Access(AccessError::NotFound { .. })
            | InternalError::Access(AccessError::NoneForUser { .. }) => {
                AdminError::not_found("SystemAccess record not found")
            }
            InternalError::Access(AccessError::AlreadyExists { user_id }) => {
                AdminError::conflict(format!("User {} already has an access record", user_id))
            }
            InternalError::Access(AccessError::SelfTargetForbidden) => {
                AdminError::validation_failed("You cannot modify your own access record")
            }
            InternalError::Access(AccessError::InsufficientRank { .. }) => {
                AdminError::insufficient_permission()
            }
            InternalError::Access(AccessError::TargetSuspended { .. }) => {
                AdminError::validation_failed(
                    "Target user is suspended; unsuspend before editing access",
                )
            }
            InternalError::Access(AccessError::TargetNotEligible { .. }) => {
                AdminError::validation_failed(
                    "Target must be an approved, non-suspended system user",
                )
            }
            InternalError::Session(_) => AdminError::unauthenticated(),
            other => {
                tracing::error!("Internal error surfaced to admin API: {:?}", other);
                AdminError::internal("An internal error occurred".to_string())
            }
        }
    }
}
