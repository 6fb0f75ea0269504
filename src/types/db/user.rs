use crate::types::internal::role::Role;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,

    // Lifecycle markers (unix seconds); suspension is the soft-delete flag,
    // rows referenced by audit logs are never hard-deleted
    pub verified_at: Option<i64>,
    pub approved_at: Option<i64>,
    pub suspended_at: Option<i64>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Model {
    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    #[sea_orm(has_one = "super::system_access::Entity")]
    SystemAccess,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::system_access::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SystemAccess.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
