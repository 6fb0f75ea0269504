use poem::Request;
use poem_openapi::{auth::Bearer, SecurityScheme};

use crate::app_data::AppData;
use crate::errors::{AdminError, AuthError};
use crate::services::{Authorizer, RequestContext};
use crate::types::db::{session, user};
use crate::types::internal::{PermissionLevel, ResourceCategory};

/// Session bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header")]
pub struct BearerAuth(pub Bearer);

/// Collect the device-identity inputs from the raw request.
pub fn request_context(req: &Request, client_fingerprint: Option<String>) -> RequestContext {
    let header = |name: &str| req.header(name).map(str::to_owned);

    RequestContext {
        client_fingerprint,
        user_agent: header("user-agent"),
        forwarded_for: header("x-forwarded-for"),
        real_ip: header("x-real-ip"),
        remote_addr: req
            .remote_addr()
            .as_socket_addr()
            .map(|addr| addr.to_string()),
    }
}

/// Resolve the bearer token to a live session and its user.
pub async fn authenticate(
    app: &AppData,
    auth: &BearerAuth,
) -> Result<(session::Model, user::Model), AuthError> {
    app.sessions.authenticate(&auth.0.token).await
}

/// Same resolution for administration endpoints, with the error vocabulary
/// those endpoints speak. Expired and revoked sessions keep their variant.
pub async fn authenticate_admin(
    app: &AppData,
    auth: &BearerAuth,
) -> Result<(session::Model, user::Model), AdminError> {
    app.sessions
        .authenticate(&auth.0.token)
        .await
        .map_err(AdminError::from)
}

/// Run the authorization evaluator for one category/level pair.
///
/// Administrative tiers pass unconditionally; system users need the matching
/// grant; everyone else is denied.
pub async fn require_permission(
    app: &AppData,
    user: &user::Model,
    category: ResourceCategory,
    level: PermissionLevel,
) -> Result<(), AdminError> {
    let access = app
        .access_service
        .find_for_user(&user.id)
        .await
        .map_err(AdminError::from)?;

    if Authorizer::is_authorized(user, access.as_ref(), category, level) {
        Ok(())
    } else {
        Err(AdminError::insufficient_permission())
    }
}
