use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::internal::SessionError;
use crate::errors::InternalError;
use crate::types::db::session::{self, Entity as Session};
use crate::types::internal::{DeviceInfo, SessionMetadata};

/// Session ledger: creates, looks up, revokes and lists session rows.
///
/// Status (active/revoked/expired) is derived from timestamps at read time,
/// never written. The only state-changing writes are `accessed_at` refreshes
/// and revocation.
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new session bound to the resolved device.
    ///
    /// No uniqueness across devices: a user may hold any number of concurrent
    /// sessions.
    pub async fn create(
        &self,
        user_id: &str,
        device: &DeviceInfo,
        ttl_seconds: i64,
    ) -> Result<session::Model, InternalError> {
        let now = Utc::now().timestamp();
        let model = session::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_owned()),
            device_fingerprint: Set(device.fingerprint.clone()),
            device_type: Set(device.device_type.as_str().to_owned()),
            ip_address: Set(device.ip_address.clone()),
            metadata: Set(SessionMetadata::from_device(device).to_json()),
            created_at: Set(now),
            accessed_at: Set(now),
            expires_at: Set(now + ttl_seconds),
            revoked_at: Set(None),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_session", e))
    }

    pub async fn find_by_id(
        &self,
        session_id: &str,
    ) -> Result<Option<session::Model>, InternalError> {
        Session::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session_by_id", e))
    }

    pub async fn get(&self, session_id: &str) -> Result<session::Model, InternalError> {
        self.find_by_id(session_id).await?.ok_or_else(|| {
            InternalError::Session(SessionError::NotFound {
                session_id: session_id.to_owned(),
            })
        })
    }

    /// Refresh `accessed_at` after a successful validation
    pub async fn touch(&self, session: session::Model) -> Result<session::Model, InternalError> {
        let mut active: session::ActiveModel = session.into();
        active.accessed_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("touch_session", e))
    }

    /// All sessions for the user, active and inactive, newest first
    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<session::Model>, InternalError> {
        Session::find()
            .filter(session::Column::UserId.eq(user_id))
            .order_by_desc(session::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_sessions_for_user", e))
    }

    /// Revoke one session.
    ///
    /// Idempotent: a session that is already revoked is returned unchanged,
    /// the desired end state already holds. Missing rows are `NotFound`.
    pub async fn revoke(
        &self,
        session_id: &str,
        reason: Option<&str>,
    ) -> Result<session::Model, InternalError> {
        let session = self.get(session_id).await?;

        if session.revoked_at.is_some() {
            return Ok(session);
        }

        let mut metadata = SessionMetadata::from_json(&session.metadata);
        metadata.revocation_reason = reason.map(|r| r.to_owned());

        let mut active: session::ActiveModel = session.into();
        active.revoked_at = Set(Some(Utc::now().timestamp()));
        active.metadata = Set(metadata.to_json());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("revoke_session", e))
    }

    /// Revoke every active session of the user except `except_session_id`.
    ///
    /// The excluded session is filtered out before any write, so the caller
    /// can never lock themselves out. Returns the number of sessions revoked.
    pub async fn revoke_all_except(
        &self,
        user_id: &str,
        except_session_id: Option<&str>,
        reason: Option<&str>,
    ) -> Result<u64, InternalError> {
        let now = Utc::now().timestamp();

        let mut query = Session::find()
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::RevokedAt.is_null())
            .filter(session::Column::ExpiresAt.gte(now));
        if let Some(except) = except_session_id {
            query = query.filter(session::Column::Id.ne(except));
        }

        let targets = query
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_sessions_to_revoke", e))?;

        let mut revoked = 0u64;
        for session in targets {
            let mut metadata = SessionMetadata::from_json(&session.metadata);
            metadata.revocation_reason = reason.map(|r| r.to_owned());

            let mut active: session::ActiveModel = session.into();
            active.revoked_at = Set(Some(now));
            active.metadata = Set(metadata.to_json());
            active
                .update(&self.db)
                .await
                .map_err(|e| InternalError::database("bulk_revoke_session", e))?;
            revoked += 1;
        }

        Ok(revoked)
    }
}
