pub mod admin;
pub mod auth;

pub use admin::AdminError;
pub use auth::{AuthError, ErrorResponse};
