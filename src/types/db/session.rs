use crate::types::internal::session_state::SessionStatus;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub user_id: String,
    pub device_fingerprint: String,
    pub device_type: String,
    pub ip_address: String,
    /// JSON blob: device brand/model, user-agent, location, revocation reason
    pub metadata: String,
    pub created_at: i64,
    pub accessed_at: i64,
    #[sea_orm(indexed)]
    pub expires_at: i64,
    pub revoked_at: Option<i64>,
}

impl Model {
    /// Derived status; no status column exists on purpose
    pub fn status(&self, now: i64) -> SessionStatus {
        SessionStatus::derive(self.revoked_at, self.expires_at, now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
