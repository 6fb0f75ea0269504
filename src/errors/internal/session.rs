use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {session_id}")]
    NotFound { session_id: String },
}
