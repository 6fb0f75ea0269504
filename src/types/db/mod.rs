pub mod audit_log;
pub mod session;
pub mod system_access;
pub mod user;
