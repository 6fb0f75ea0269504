use thiserror::Error;

pub mod access;
pub mod audit;
pub mod database;
pub mod session;
pub mod upstream;
pub mod user;

pub use access::AccessError;
pub use audit::AuditError;
pub use database::DatabaseError;
pub use session::SessionError;
pub use upstream::UpstreamError;
pub use user::UserError;

/// Internal error type for store and service operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors
/// (store-specific). Not exposed via API - endpoints must convert to the API
/// error enums.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
