use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::fmt;

/// Event kinds recorded in the audit trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditAction {
    LoginSuccess,
    LoginFailure,
    Logout,
    SessionRevoked,
    SessionsBulkRevoked,
    UserRegistered,
    UserUpdated,
    UserApproved,
    UserSuspended,
    UserUnsuspended,
    UserRoleChanged,
    PasswordChanged,
    AccessCreated,
    AccessUpdated,
    AccessSuspended,
    AccessUnsuspended,
    AccessDeleted,
    Custom(String),
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailure => "login_failure",
            Self::Logout => "logout",
            Self::SessionRevoked => "session_revoked",
            Self::SessionsBulkRevoked => "sessions_bulk_revoked",
            Self::UserRegistered => "user_registered",
            Self::UserUpdated => "user_updated",
            Self::UserApproved => "user_approved",
            Self::UserSuspended => "user_suspended",
            Self::UserUnsuspended => "user_unsuspended",
            Self::UserRoleChanged => "user_role_changed",
            Self::PasswordChanged => "password_changed",
            Self::AccessCreated => "access_created",
            Self::AccessUpdated => "access_updated",
            Self::AccessSuspended => "access_suspended",
            Self::AccessUnsuspended => "access_unsuspended",
            Self::AccessDeleted => "access_deleted",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resource kinds an audit row can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEntity {
    User,
    Session,
    SystemAccess,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Session => "session",
            Self::SystemAccess => "system_access",
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit trail entry, built fluently at the call site and handed to the
/// trail for a best-effort append.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: String,
    pub actor_user_id: Option<String>,
    pub description: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditRecord {
    pub fn new(action: AuditAction, entity: AuditEntity, entity_id: impl Into<String>) -> Self {
        Self {
            action,
            entity,
            entity_id: entity_id.into(),
            actor_user_id: None,
            description: None,
            data: HashMap::new(),
        }
    }

    /// Actor user id; absent means the system itself acted
    pub fn actor(mut self, user_id: impl Into<String>) -> Self {
        self.actor_user_id = Some(user_id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.data.insert(key.into(), value);
        }
        self
    }

    /// Serialized before-state snapshot of the mutated entity
    pub fn before(self, snapshot: impl Serialize) -> Self {
        let rendered = serde_json::to_string(&snapshot).unwrap_or_default();
        self.field("before", json!(rendered))
    }

    /// Serialized after-state snapshot of the mutated entity
    pub fn after(self, snapshot: impl Serialize) -> Self {
        let rendered = serde_json::to_string(&snapshot).unwrap_or_default();
        self.field("after", json!(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder_collects_fields() {
        let record = AuditRecord::new(AuditAction::AccessDeleted, AuditEntity::SystemAccess, "a-1")
            .actor("u-9")
            .description("access removed")
            .field("target_user_id", "u-2");

        assert_eq!(record.action.as_str(), "access_deleted");
        assert_eq!(record.entity.as_str(), "system_access");
        assert_eq!(record.actor_user_id.as_deref(), Some("u-9"));
        assert_eq!(record.data["target_user_id"], json!("u-2"));
    }

    #[test]
    fn test_snapshots_are_stored_as_serialized_strings() {
        let record = AuditRecord::new(AuditAction::UserUpdated, AuditEntity::User, "u-1")
            .before(json!({"name": "Old"}))
            .after(json!({"name": "New"}));

        assert!(record.data["before"].as_str().unwrap().contains("Old"));
        assert!(record.data["after"].as_str().unwrap().contains("New"));
    }
}
