use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse privilege tier attached to every user.
///
/// Tiers are ordered: `User < SystemUser < SystemAdmin < SystemOwner`.
/// Fine-grained gating for `SystemUser` lives in the SystemAccess grants;
/// the two admin tiers bypass category checks entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unprivileged account, denied for every system-administration resource
    #[sea_orm(string_value = "user")]
    User,

    /// Staff account gated by a per-category SystemAccess record
    #[sea_orm(string_value = "system_user")]
    SystemUser,

    /// Administrator, bypasses category checks
    #[sea_orm(string_value = "system_admin")]
    SystemAdmin,

    /// Owner, bypasses category checks
    #[sea_orm(string_value = "system_owner")]
    SystemOwner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::SystemUser => "system_user",
            Role::SystemAdmin => "system_admin",
            Role::SystemOwner => "system_owner",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::SystemUser => 1,
            Role::SystemAdmin => 2,
            Role::SystemOwner => 3,
        }
    }

    /// Strictly higher privilege tier than `other`
    pub fn outranks(&self, other: Role) -> bool {
        self.rank() > other.rank()
    }

    /// Admin or owner tier
    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::SystemAdmin | Role::SystemOwner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
