use poem_openapi::Object;

use crate::types::db::user;

/// Public projection of a user row. The password hash never leaves the
/// store layer.
#[derive(Object, Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub role: String,
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub verified_at: Option<i64>,
    pub approved_at: Option<i64>,
    pub suspended_at: Option<i64>,
    pub created_at: i64,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        UserView {
            id: model.id,
            email: model.email,
            role: model.role.as_str().to_owned(),
            name: model.name,
            phone: model.phone,
            avatar_url: model.avatar_url,
            verified_at: model.verified_at,
            approved_at: model.approved_at,
            suspended_at: model.suspended_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct UpdateProfileRequest {
    #[oai(validator(max_length = 120))]
    pub name: Option<String>,
    #[oai(validator(max_length = 32))]
    pub phone: Option<String>,
    #[oai(validator(max_length = 512))]
    pub avatar_url: Option<String>,
}

#[derive(Object, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    /// New password, minimum 8 characters
    #[oai(validator(min_length = 8, max_length = 128))]
    pub new_password: String,
}
