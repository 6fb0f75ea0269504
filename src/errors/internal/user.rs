use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {user_id}")]
    NotFound { user_id: String },

    #[error("No user registered for email {email}")]
    EmailNotFound { email: String },

    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    #[error("Incorrect password for user {user_id}")]
    IncorrectPassword { user_id: String },

    #[error("User {user_id} is suspended")]
    Suspended { user_id: String },

    #[error("User {user_id} is not approved")]
    NotApproved { user_id: String },
}
