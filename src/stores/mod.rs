// Stores layer - Data access and repository pattern
pub mod access_store;
pub mod audit_store;
pub mod session_store;
pub mod user_store;

pub use access_store::AccessStore;
pub use audit_store::AuditStore;
pub use session_store::SessionStore;
pub use user_store::{NewUser, UserStore};
