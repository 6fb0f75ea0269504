pub mod access;
pub mod audit;
pub mod auth;
pub mod device;
pub mod role;
pub mod session_state;

pub use access::{PermissionGrants, PermissionLevel, ResourceCategory};
pub use audit::{AuditAction, AuditEntity, AuditRecord};
pub use auth::SessionClaims;
pub use device::{DeviceInfo, DeviceType, GeoLocation, SessionMetadata};
pub use role::Role;
pub use session_state::SessionStatus;
