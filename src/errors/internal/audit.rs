use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit log write failed: {0}")]
    LogWriteFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
