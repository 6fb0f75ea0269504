use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::errors::internal::AccessError;
use crate::errors::InternalError;
use crate::types::db::system_access::{self, Entity as SystemAccess};
use crate::types::internal::PermissionGrants;

/// Repository for SystemAccess grant rows (one per system user)
pub struct AccessStore {
    db: DatabaseConnection,
}

impl AccessStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<system_access::Model>, InternalError> {
        SystemAccess::find()
            .filter(system_access::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_access_for_user", e))
    }

    pub async fn get(&self, access_id: &str) -> Result<system_access::Model, InternalError> {
        SystemAccess::find_by_id(access_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_access_by_id", e))?
            .ok_or_else(|| {
                InternalError::Access(AccessError::NotFound {
                    access_id: access_id.to_owned(),
                })
            })
    }

    pub async fn list(&self) -> Result<Vec<system_access::Model>, InternalError> {
        SystemAccess::find()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_access", e))
    }

    /// Insert a grant row. The unique user_id index backs the at-most-one
    /// invariant; a duplicate maps to `AlreadyExists`.
    pub async fn create(
        &self,
        user_id: &str,
        assigner_id: &str,
        grants: &PermissionGrants,
        expires_at: Option<i64>,
    ) -> Result<system_access::Model, InternalError> {
        let grants_json = grants
            .to_json()
            .map_err(|e| InternalError::parse("permission_grants", e.to_string()))?;

        let now = Utc::now().timestamp();
        let model = system_access::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_owned()),
            assigner_id: Set(assigner_id.to_owned()),
            grants: Set(grants_json),
            suspended_at: Set(None),
            expires_at: Set(expires_at),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                InternalError::Access(AccessError::AlreadyExists {
                    user_id: user_id.to_owned(),
                })
            } else {
                InternalError::database("insert_access", e)
            }
        })
    }

    pub async fn update_grants(
        &self,
        access_id: &str,
        grants: &PermissionGrants,
        expires_at: Option<i64>,
    ) -> Result<system_access::Model, InternalError> {
        let grants_json = grants
            .to_json()
            .map_err(|e| InternalError::parse("permission_grants", e.to_string()))?;

        let access = self.get(access_id).await?;
        let mut active: system_access::ActiveModel = access.into();
        active.grants = Set(grants_json);
        active.expires_at = Set(expires_at);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_access_grants", e))
    }

    /// Soft-disable without losing the row or its audit trail
    pub async fn suspend(&self, access_id: &str) -> Result<system_access::Model, InternalError> {
        let access = self.get(access_id).await?;
        let now = Utc::now().timestamp();
        let mut active: system_access::ActiveModel = access.into();
        active.suspended_at = Set(Some(now));
        active.updated_at = Set(now);

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("suspend_access", e))
    }

    pub async fn unsuspend(&self, access_id: &str) -> Result<system_access::Model, InternalError> {
        let access = self.get(access_id).await?;
        let mut active: system_access::ActiveModel = access.into();
        active.suspended_at = Set(None);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("unsuspend_access", e))
    }

    /// Hard delete: immediately strips all privileges for the subject
    pub async fn delete(&self, access_id: &str) -> Result<system_access::Model, InternalError> {
        let access = self.get(access_id).await?;
        let snapshot = access.clone();

        access
            .delete(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_access", e))?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_identity_db, test_system_user};
    use crate::types::internal::{PermissionLevel, ResourceCategory};

    #[tokio::test]
    async fn test_grants_round_trip_exactly() {
        let db = setup_identity_db().await;
        let user = test_system_user(&db, "grants@example.com").await;
        let store = AccessStore::new(db);

        let grants = PermissionGrants::from_pairs([(
            ResourceCategory::Users,
            vec![PermissionLevel::View, PermissionLevel::Create],
        )]);

        let created = store
            .create(&user.id, "assigner-1", &grants, None)
            .await
            .unwrap();

        let loaded = store.get(&created.id).await.unwrap();
        let restored = PermissionGrants::from_json(&loaded.grants).unwrap();

        // Exactly what was stored: no expansion, no contraction
        assert_eq!(restored, grants);
        assert!(restored.contains(ResourceCategory::Users, PermissionLevel::View));
        assert!(restored.contains(ResourceCategory::Users, PermissionLevel::Create));
        assert!(!restored.contains(ResourceCategory::Users, PermissionLevel::Update));
    }

    #[tokio::test]
    async fn test_second_row_for_user_is_rejected() {
        let db = setup_identity_db().await;
        let user = test_system_user(&db, "one-row@example.com").await;
        let store = AccessStore::new(db);

        let grants = PermissionGrants::empty();
        store
            .create(&user.id, "assigner-1", &grants, None)
            .await
            .unwrap();

        let second = store.create(&user.id, "assigner-1", &grants, None).await;
        assert!(matches!(
            second,
            Err(InternalError::Access(AccessError::AlreadyExists { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_and_removes_row() {
        let db = setup_identity_db().await;
        let user = test_system_user(&db, "del@example.com").await;
        let store = AccessStore::new(db);

        let created = store
            .create(&user.id, "assigner-1", &PermissionGrants::empty(), None)
            .await
            .unwrap();

        let snapshot = store.delete(&created.id).await.unwrap();
        assert_eq!(snapshot.id, created.id);

        assert!(store.find_for_user(&user.id).await.unwrap().is_none());
        assert!(matches!(
            store.get(&created.id).await,
            Err(InternalError::Access(AccessError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_suspend_and_unsuspend() {
        let db = setup_identity_db().await;
        let user = test_system_user(&db, "sus@example.com").await;
        let store = AccessStore::new(db);

        let created = store
            .create(&user.id, "assigner-1", &PermissionGrants::empty(), None)
            .await
            .unwrap();

        let suspended = store.suspend(&created.id).await.unwrap();
        assert!(suspended.suspended_at.is_some());

        let restored = store.unsuspend(&created.id).await.unwrap();
        assert!(restored.suspended_at.is_none());
    }
}
