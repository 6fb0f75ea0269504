use poem_openapi::Object;

use crate::types::db::session;
use crate::types::dto::user::UserView;
use crate::types::internal::{SessionMetadata, SessionStatus};
use chrono::Utc;

#[derive(Object, Debug)]
pub struct RegisterRequest {
    #[oai(validator(max_length = 254))]
    pub email: String,
    /// Minimum 8 characters
    #[oai(validator(min_length = 8, max_length = 128))]
    pub password: String,
    #[oai(validator(min_length = 1, max_length = 120))]
    pub name: String,
    #[oai(validator(max_length = 32))]
    pub phone: Option<String>,
}

#[derive(Object, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Stable client-generated device fingerprint, if the client has one
    pub device_fingerprint: Option<String>,
}

#[derive(Object, Debug)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub session: SessionView,
    pub user: UserView,
}

#[derive(Object, Debug, Clone)]
pub struct LocationView {
    pub city: String,
    pub region: String,
    pub country: String,
    pub isp: String,
}

/// One row in the "your devices" list
#[derive(Object, Debug, Clone)]
pub struct SessionView {
    pub id: String,
    pub device_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub location: Option<LocationView>,
    /// "active", "revoked" or "expired", derived at read time
    pub status: String,
    /// True for the session making this request
    pub current: bool,
    pub revocation_reason: Option<String>,
    pub created_at: i64,
    pub accessed_at: i64,
    pub expires_at: i64,
}

impl SessionView {
    pub fn from_model(model: &session::Model, current_session_id: &str) -> Self {
        let metadata = SessionMetadata::from_json(&model.metadata);
        let status = match model.status(Utc::now().timestamp()) {
            SessionStatus::Active => "active",
            SessionStatus::Revoked => "revoked",
            SessionStatus::Expired => "expired",
        };

        SessionView {
            id: model.id.clone(),
            device_type: model.device_type.clone(),
            brand: metadata.brand,
            model: metadata.model,
            ip_address: model.ip_address.clone(),
            user_agent: metadata.user_agent,
            location: metadata.location.map(|l| LocationView {
                city: l.city,
                region: l.region,
                country: l.country,
                isp: l.isp,
            }),
            status: status.to_owned(),
            current: model.id == current_session_id,
            revocation_reason: metadata.revocation_reason,
            created_at: model.created_at,
            accessed_at: model.accessed_at,
            expires_at: model.expires_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionView>,
}

#[derive(Object, Debug)]
pub struct BulkRevokeResponse {
    pub revoked_count: u64,
}
