use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{authenticate, request_context, BearerAuth};
use crate::app_data::AppData;
use crate::errors::AuthError;
use crate::types::dto::auth::{
    BulkRevokeResponse, LoginRequest, LoginResponse, RegisterRequest, SessionListResponse,
    SessionView,
};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::user::{ChangePasswordRequest, UpdateProfileRequest, UserView};

#[derive(Tags)]
enum AuthTags {
    /// Registration, login and session self-management
    Authentication,
}

/// Authentication and session endpoints
pub struct AuthApi {
    app: Arc<AppData>,
}

impl AuthApi {
    pub fn new(app: Arc<AppData>) -> Self {
        Self { app }
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account. The account stays locked until approved.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<Json<UserView>, AuthError> {
        let body = body.0;
        if !body.email.contains('@') {
            return Err(AuthError::validation_failed("Invalid email address"));
        }

        let created = self
            .app
            .user_service
            .register(body.email, body.password, body.name, body.phone)
            .await?;

        Ok(Json(UserView::from(created)))
    }

    /// Login with email and password; opens a session bound to this device
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthError> {
        let body = body.0;
        let user = self.app.user_service.login(&body.email, &body.password).await?;

        let ctx = request_context(req, body.device_fingerprint);
        let device = self.app.sessions.resolve_device(&ctx).await;
        let (session, token) = self.app.sessions.open(&user, &device).await?;

        let view = SessionView::from_model(&session, &session.id);
        Ok(Json(LoginResponse {
            token,
            session: view,
            user: UserView::from(user),
        }))
    }

    /// The authenticated user's own profile
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserView>, AuthError> {
        let (_, user) = authenticate(&self.app, &auth).await?;
        Ok(Json(UserView::from(user)))
    }

    /// Update the authenticated user's profile fields
    #[oai(path = "/me", method = "put", tag = "AuthTags::Authentication")]
    async fn update_me(
        &self,
        auth: BearerAuth,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserView>, AuthError> {
        let (_, user) = authenticate(&self.app, &auth).await?;
        let body = body.0;

        let updated = self
            .app
            .user_service
            .update_profile(&user, body.name, body.phone, body.avatar_url)
            .await?;

        Ok(Json(UserView::from(updated)))
    }

    /// Change password, re-proving the current one
    #[oai(path = "/password", method = "post", tag = "AuthTags::Authentication")]
    async fn change_password(
        &self,
        auth: BearerAuth,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let (_, user) = authenticate(&self.app, &auth).await?;
        let body = body.0;

        self.app
            .user_service
            .change_password(&user, &body.current_password, &body.new_password)
            .await?;

        Ok(Json(ActionResponse::ok("Password changed")))
    }

    /// End the current session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, auth: BearerAuth) -> Result<Json<ActionResponse>, AuthError> {
        let (session, user) = authenticate(&self.app, &auth).await?;
        self.app.sessions.logout(&user, &session.id).await?;
        Ok(Json(ActionResponse::ok("Logged out")))
    }

    /// All of the caller's sessions, active and historical, newest first
    #[oai(path = "/sessions", method = "get", tag = "AuthTags::Authentication")]
    async fn list_sessions(&self, auth: BearerAuth) -> Result<Json<SessionListResponse>, AuthError> {
        let (session, user) = authenticate(&self.app, &auth).await?;
        let sessions = self.app.sessions.list_for_user(&user.id).await?;

        Ok(Json(SessionListResponse {
            sessions: sessions
                .iter()
                .map(|s| SessionView::from_model(s, &session.id))
                .collect(),
        }))
    }

    /// Revoke one of the caller's sessions. Safe to repeat.
    #[oai(
        path = "/sessions/:session_id",
        method = "delete",
        tag = "AuthTags::Authentication"
    )]
    async fn revoke_session(
        &self,
        auth: BearerAuth,
        session_id: Path<String>,
    ) -> Result<Json<SessionView>, AuthError> {
        let (current, user) = authenticate(&self.app, &auth).await?;
        let revoked = self.app.sessions.revoke_own(&user, &session_id.0).await?;
        Ok(Json(SessionView::from_model(&revoked, &current.id)))
    }

    /// Revoke every session except the one making this request
    #[oai(
        path = "/sessions/revoke-others",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn revoke_other_sessions(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<BulkRevokeResponse>, AuthError> {
        let (session, user) = authenticate(&self.app, &auth).await?;
        let revoked_count = self.app.sessions.revoke_others(&user, &session.id).await?;
        Ok(Json(BulkRevokeResponse { revoked_count }))
    }
}
