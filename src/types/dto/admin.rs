use poem_openapi::Object;
use std::collections::BTreeMap;

use crate::types::db::{audit_log, system_access};
use crate::types::internal::{PermissionGrants, PermissionLevel, ResourceCategory};

/// Wire shape of a grants map: category name to permission-level names.
/// Unlisted categories mean empty sets.
pub type GrantsMap = BTreeMap<String, Vec<String>>;

/// Validate and convert a wire grants map into the internal representation.
/// Unknown category or level names are rejected by name.
pub fn parse_grants(map: &GrantsMap) -> Result<PermissionGrants, String> {
    let mut grants = PermissionGrants::empty();
    for (category_name, level_names) in map {
        let category = ResourceCategory::parse(category_name)
            .ok_or_else(|| format!("Unknown resource category: {}", category_name))?;
        let mut levels = Vec::with_capacity(level_names.len());
        for level_name in level_names {
            let level = PermissionLevel::parse(level_name)
                .ok_or_else(|| format!("Unknown permission level: {}", level_name))?;
            levels.push(level);
        }
        grants.set(category, levels);
    }
    Ok(grants)
}

fn render_grants(grants: &PermissionGrants) -> GrantsMap {
    let mut map = GrantsMap::new();
    for category in ResourceCategory::ALL {
        map.insert(
            category.as_str().to_owned(),
            grants
                .levels(category)
                .iter()
                .map(|l| l.as_str().to_owned())
                .collect(),
        );
    }
    map
}

#[derive(Object, Debug)]
pub struct CreateAccessRequest {
    pub user_id: String,
    pub grants: GrantsMap,
    /// Unix seconds; absent means the grant does not expire
    pub expires_at: Option<i64>,
}

#[derive(Object, Debug)]
pub struct UpdateAccessRequest {
    /// Complete replacement grants map, not a partial patch
    pub grants: GrantsMap,
    pub expires_at: Option<i64>,
}

#[derive(Object, Debug)]
pub struct AccessView {
    pub id: String,
    pub user_id: String,
    pub assigner_id: String,
    /// All twenty categories, each with its explicit level set
    pub grants: GrantsMap,
    pub suspended_at: Option<i64>,
    pub expires_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AccessView {
    /// A stored blob that no longer parses renders as fully-empty grants,
    /// matching the evaluator's deny-on-malformed behavior.
    pub fn from_model(model: &system_access::Model) -> Self {
        let grants =
            PermissionGrants::from_json(&model.grants).unwrap_or_else(|_| PermissionGrants::empty());
        AccessView {
            id: model.id.clone(),
            user_id: model.user_id.clone(),
            assigner_id: model.assigner_id.clone(),
            grants: render_grants(&grants),
            suspended_at: model.suspended_at,
            expires_at: model.expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct AccessListResponse {
    pub access_records: Vec<AccessView>,
}

#[derive(Object, Debug)]
pub struct SetRoleRequest {
    /// One of "user", "system_user", "system_admin", "system_owner"
    pub role: String,
}

#[derive(Object, Debug)]
pub struct AuditLogView {
    pub id: i64,
    pub action: String,
    pub entity: String,
    pub entity_id: String,
    pub description: Option<String>,
    /// JSON blob of structured event fields
    pub metadata: String,
    /// Acting user; absent for system-initiated events
    pub user_id: Option<String>,
    pub created_at: i64,
}

impl From<audit_log::Model> for AuditLogView {
    fn from(model: audit_log::Model) -> Self {
        AuditLogView {
            id: model.id,
            action: model.action,
            entity: model.entity,
            entity_id: model.entity_id,
            description: model.description,
            metadata: model.metadata,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogView>,
}

#[derive(Object, Debug)]
pub struct UserListResponse {
    pub users: Vec<crate::types::dto::user::UserView>,
}
