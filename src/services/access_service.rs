use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::errors::InternalError;
use crate::services::audit_logger::AuditTrail;
use crate::services::authorizer::Authorizer;
use crate::stores::{AccessStore, UserStore};
use crate::types::db::{system_access, user};
use crate::types::internal::{AuditAction, AuditEntity, AuditRecord, PermissionGrants};

/// Administration of SystemAccess grant rows.
///
/// Every mutation runs the same guard sequence before touching the row:
/// never the actor's own record, the actor must outrank the subject, and the
/// subject account must not be suspended. Guard order is fixed so callers get
/// deterministic errors.
pub struct AccessService {
    access: AccessStore,
    users: Arc<UserStore>,
    audit: Arc<AuditTrail>,
}

impl AccessService {
    pub fn new(access: AccessStore, users: Arc<UserStore>, audit: Arc<AuditTrail>) -> Self {
        Self {
            access,
            users,
            audit,
        }
    }

    pub async fn list(&self) -> Result<Vec<system_access::Model>, InternalError> {
        self.access.list().await
    }

    pub async fn find_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<system_access::Model>, InternalError> {
        self.access.find_for_user(user_id).await
    }

    fn guard(actor: &user::Model, target: &user::Model) -> Result<(), InternalError> {
        Authorizer::ensure_not_self(&actor.id, &target.id)?;
        Authorizer::ensure_outranks(actor, target)?;
        Authorizer::ensure_target_not_suspended(target)?;
        Ok(())
    }

    fn snapshot(access: &system_access::Model) -> serde_json::Value {
        json!({
            "user_id": access.user_id,
            "grants": access.grants,
            "suspended_at": access.suspended_at,
            "expires_at": access.expires_at,
        })
    }

    /// Grant a system user their access record.
    pub async fn create(
        &self,
        actor: &user::Model,
        target_user_id: &str,
        grants: &PermissionGrants,
        expires_at: Option<i64>,
    ) -> Result<system_access::Model, InternalError> {
        let target = self.users.get(target_user_id).await?;
        Self::guard(actor, &target)?;
        Authorizer::ensure_grant_eligible(&target)?;

        let created = self
            .access
            .create(target_user_id, &actor.id, grants, expires_at)
            .await?;

        info!(actor_id = %actor.id, target_user_id = %target_user_id, access_id = %created.id, "Access record created");

        self.audit
            .record_and_notify(
                AuditRecord::new(AuditAction::AccessCreated, AuditEntity::SystemAccess, &created.id)
                    .actor(&actor.id)
                    .field("target_user_id", target_user_id)
                    .after(Self::snapshot(&created)),
                &format!("Access granted to {} by {}", target.email, actor.email),
            )
            .await;

        Ok(created)
    }

    /// Replace the grant map wholesale. Partial grant edits do not exist;
    /// callers send the complete desired state.
    pub async fn update_grants(
        &self,
        actor: &user::Model,
        access_id: &str,
        grants: &PermissionGrants,
        expires_at: Option<i64>,
    ) -> Result<system_access::Model, InternalError> {
        let existing = self.access.get(access_id).await?;
        let target = self.users.get(&existing.user_id).await?;
        Self::guard(actor, &target)?;

        let before = Self::snapshot(&existing);
        let updated = self
            .access
            .update_grants(access_id, grants, expires_at)
            .await?;

        self.audit
            .record(
                AuditRecord::new(AuditAction::AccessUpdated, AuditEntity::SystemAccess, access_id)
                    .actor(&actor.id)
                    .field("target_user_id", &updated.user_id)
                    .before(before)
                    .after(Self::snapshot(&updated)),
            )
            .await;

        Ok(updated)
    }

    pub async fn suspend(
        &self,
        actor: &user::Model,
        access_id: &str,
    ) -> Result<system_access::Model, InternalError> {
        let existing = self.access.get(access_id).await?;
        let target = self.users.get(&existing.user_id).await?;
        Self::guard(actor, &target)?;

        let suspended = self.access.suspend(access_id).await?;

        self.audit
            .record(
                AuditRecord::new(
                    AuditAction::AccessSuspended,
                    AuditEntity::SystemAccess,
                    access_id,
                )
                .actor(&actor.id)
                .field("target_user_id", &suspended.user_id),
            )
            .await;

        Ok(suspended)
    }

    pub async fn unsuspend(
        &self,
        actor: &user::Model,
        access_id: &str,
    ) -> Result<system_access::Model, InternalError> {
        let existing = self.access.get(access_id).await?;
        let target = self.users.get(&existing.user_id).await?;
        Self::guard(actor, &target)?;

        let restored = self.access.unsuspend(access_id).await?;

        self.audit
            .record(
                AuditRecord::new(
                    AuditAction::AccessUnsuspended,
                    AuditEntity::SystemAccess,
                    access_id,
                )
                .actor(&actor.id)
                .field("target_user_id", &restored.user_id),
            )
            .await;

        Ok(restored)
    }

    /// Remove the record entirely. The subject keeps their account and
    /// sessions but loses every category immediately.
    pub async fn delete(
        &self,
        actor: &user::Model,
        access_id: &str,
    ) -> Result<(), InternalError> {
        let existing = self.access.get(access_id).await?;
        let target = self.users.get(&existing.user_id).await?;
        Self::guard(actor, &target)?;

        let snapshot = self.access.delete(access_id).await?;

        info!(actor_id = %actor.id, target_user_id = %snapshot.user_id, access_id = %access_id, "Access record deleted");

        self.audit
            .record_and_notify(
                AuditRecord::new(AuditAction::AccessDeleted, AuditEntity::SystemAccess, access_id)
                    .actor(&actor.id)
                    .field("target_user_id", &snapshot.user_id)
                    .before(Self::snapshot(&snapshot)),
                &format!("Access revoked for {} by {}", target.email, actor.email),
            )
            .await;

        Ok(())
    }
}
