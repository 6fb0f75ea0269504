use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("SystemAccess not found: {access_id}")]
    NotFound { access_id: String },

    #[error("No SystemAccess record for user {user_id}")]
    NoneForUser { user_id: String },

    #[error("User {user_id} already has a SystemAccess record")]
    AlreadyExists { user_id: String },

    #[error("Users may not modify their own access record")]
    SelfTargetForbidden,

    #[error("Actor role {actor_role} does not outrank target role {target_role}")]
    InsufficientRank {
        actor_role: String,
        target_role: String,
    },

    #[error("Target user {user_id} is suspended; unsuspend before editing access")]
    TargetSuspended { user_id: String },

    #[error("Target user {user_id} is not an approved system user")]
    TargetNotEligible { user_id: String },

    #[error("Malformed grants blob for access {access_id}: {message}")]
    MalformedGrants { access_id: String, message: String },
}
