use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{authenticate_admin, require_permission, BearerAuth};
use crate::app_data::AppData;
use crate::errors::AdminError;
use crate::types::dto::admin::{
    parse_grants, AccessListResponse, AccessView, AuditLogListResponse, AuditLogView,
    CreateAccessRequest, SetRoleRequest, UpdateAccessRequest, UserListResponse,
};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::user::UserView;
use crate::types::internal::{PermissionLevel, ResourceCategory, Role};

#[derive(Tags)]
enum AdminTags {
    /// User administration
    Users,
    /// SystemAccess grant administration
    Access,
    /// Audit trail
    Audit,
}

/// Administration endpoints.
///
/// Every handler authenticates the session, then runs the authorization
/// evaluator for the category/level the operation touches. Business-rule
/// guards (self-target, rank, suspension) live in the services.
pub struct AdminApi {
    app: Arc<AppData>,
}

impl AdminApi {
    pub fn new(app: Arc<AppData>) -> Self {
        Self { app }
    }
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List all users, newest first
    #[oai(path = "/users", method = "get", tag = "AdminTags::Users")]
    async fn list_users(&self, auth: BearerAuth) -> Result<Json<UserListResponse>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::View)
            .await?;

        let users = self.app.user_service.list().await?;
        Ok(Json(UserListResponse {
            users: users.into_iter().map(UserView::from).collect(),
        }))
    }

    /// One user by id
    #[oai(path = "/users/:user_id", method = "get", tag = "AdminTags::Users")]
    async fn get_user(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<UserView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::View)
            .await?;

        let user = self.app.user_service.get(&user_id.0).await?;
        Ok(Json(UserView::from(user)))
    }

    /// Approve a pending account
    #[oai(
        path = "/users/:user_id/approve",
        method = "post",
        tag = "AdminTags::Users"
    )]
    async fn approve_user(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<UserView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let approved = self.app.user_service.approve(&actor, &user_id.0).await?;
        Ok(Json(UserView::from(approved)))
    }

    /// Suspend an account and force-logout all of its sessions
    #[oai(
        path = "/users/:user_id/suspend",
        method = "post",
        tag = "AdminTags::Users"
    )]
    async fn suspend_user(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<UserView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let suspended = self.app.user_service.suspend(&actor, &user_id.0).await?;
        Ok(Json(UserView::from(suspended)))
    }

    /// Lift a suspension
    #[oai(
        path = "/users/:user_id/unsuspend",
        method = "post",
        tag = "AdminTags::Users"
    )]
    async fn unsuspend_user(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<UserView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let restored = self.app.user_service.unsuspend(&actor, &user_id.0).await?;
        Ok(Json(UserView::from(restored)))
    }

    /// Change a user's role tier
    #[oai(path = "/users/:user_id/role", method = "put", tag = "AdminTags::Users")]
    async fn set_user_role(
        &self,
        auth: BearerAuth,
        user_id: Path<String>,
        body: Json<SetRoleRequest>,
    ) -> Result<Json<UserView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let role = parse_role(&body.0.role)?;
        let updated = self
            .app
            .user_service
            .set_role(&actor, &user_id.0, role)
            .await?;
        Ok(Json(UserView::from(updated)))
    }

    /// All SystemAccess records
    #[oai(path = "/access", method = "get", tag = "AdminTags::Access")]
    async fn list_access(&self, auth: BearerAuth) -> Result<Json<AccessListResponse>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::View)
            .await?;

        let records = self.app.access_service.list().await?;
        Ok(Json(AccessListResponse {
            access_records: records.iter().map(AccessView::from_model).collect(),
        }))
    }

    /// Grant a system user their access record
    #[oai(path = "/access", method = "post", tag = "AdminTags::Access")]
    async fn create_access(
        &self,
        auth: BearerAuth,
        body: Json<CreateAccessRequest>,
    ) -> Result<Json<AccessView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Create)
            .await?;

        let body = body.0;
        let grants = parse_grants(&body.grants).map_err(AdminError::validation_failed)?;

        let created = self
            .app
            .access_service
            .create(&actor, &body.user_id, &grants, body.expires_at)
            .await?;
        Ok(Json(AccessView::from_model(&created)))
    }

    /// Replace an access record's grants map
    #[oai(path = "/access/:access_id", method = "put", tag = "AdminTags::Access")]
    async fn update_access(
        &self,
        auth: BearerAuth,
        access_id: Path<String>,
        body: Json<UpdateAccessRequest>,
    ) -> Result<Json<AccessView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let body = body.0;
        let grants = parse_grants(&body.grants).map_err(AdminError::validation_failed)?;

        let updated = self
            .app
            .access_service
            .update_grants(&actor, &access_id.0, &grants, body.expires_at)
            .await?;
        Ok(Json(AccessView::from_model(&updated)))
    }

    /// Temporarily disable an access record
    #[oai(
        path = "/access/:access_id/suspend",
        method = "post",
        tag = "AdminTags::Access"
    )]
    async fn suspend_access(
        &self,
        auth: BearerAuth,
        access_id: Path<String>,
    ) -> Result<Json<AccessView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let suspended = self
            .app
            .access_service
            .suspend(&actor, &access_id.0)
            .await?;
        Ok(Json(AccessView::from_model(&suspended)))
    }

    /// Re-enable a suspended access record
    #[oai(
        path = "/access/:access_id/unsuspend",
        method = "post",
        tag = "AdminTags::Access"
    )]
    async fn unsuspend_access(
        &self,
        auth: BearerAuth,
        access_id: Path<String>,
    ) -> Result<Json<AccessView>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Update)
            .await?;

        let restored = self
            .app
            .access_service
            .unsuspend(&actor, &access_id.0)
            .await?;
        Ok(Json(AccessView::from_model(&restored)))
    }

    /// Delete an access record, stripping all categories at once
    #[oai(
        path = "/access/:access_id",
        method = "delete",
        tag = "AdminTags::Access"
    )]
    async fn delete_access(
        &self,
        auth: BearerAuth,
        access_id: Path<String>,
    ) -> Result<Json<ActionResponse>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(&self.app, &actor, ResourceCategory::Users, PermissionLevel::Delete)
            .await?;

        self.app.access_service.delete(&actor, &access_id.0).await?;
        Ok(Json(ActionResponse::ok("Access record deleted")))
    }

    /// Audit trail, newest first
    #[oai(path = "/audit-logs", method = "get", tag = "AdminTags::Audit")]
    async fn list_audit_logs(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<AuditLogListResponse>, AdminError> {
        let (_, actor) = authenticate_admin(&self.app, &auth).await?;
        require_permission(
            &self.app,
            &actor,
            ResourceCategory::Reporting,
            PermissionLevel::View,
        )
        .await?;

        let logs = self.app.audit.list().await?;
        Ok(Json(AuditLogListResponse {
            logs: logs.into_iter().map(AuditLogView::from).collect(),
        }))
    }
}

fn parse_role(raw: &str) -> Result<Role, AdminError> {
    match raw {
        "user" => Ok(Role::User),
        "system_user" => Ok(Role::SystemUser),
        "system_admin" => Ok(Role::SystemAdmin),
        "system_owner" => Ok(Role::SystemOwner),
        other => Err(AdminError::validation_failed(format!(
            "Unknown role: {}",
            other
        ))),
    }
}
