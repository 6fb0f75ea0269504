use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_log;
use crate::types::internal::AuditRecord;

/// Repository for the append-only audit log
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one audit row.
    ///
    /// Callers that sit on the primary mutation path must treat failures here
    /// as best-effort (see AuditTrail); this method itself just reports them.
    pub async fn append(&self, record: AuditRecord) -> Result<audit_log::Model, InternalError> {
        let metadata = serde_json::to_string(&record.data)
            .map_err(|e| AuditError::LogWriteFailed(format!("serialize metadata: {}", e)))?;

        let model = audit_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            action: Set(record.action.as_str().to_owned()),
            entity: Set(record.entity.as_str().to_owned()),
            entity_id: Set(record.entity_id),
            description: Set(record.description),
            metadata: Set(metadata),
            user_id: Set(record.actor_user_id),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("append_audit_log", e))
    }

    /// Newest-first, read-only. Rows are never updated or deleted.
    pub async fn list(&self) -> Result<Vec<audit_log::Model>, InternalError> {
        audit_log::Entity::find()
            .order_by_desc(audit_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_audit_logs", e))
    }
}
