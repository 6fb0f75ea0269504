use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::internal::SessionError;
use crate::errors::{AuthError, InternalError};
use crate::services::audit_logger::AuditTrail;
use crate::services::device_resolver::{DeviceResolver, RequestContext};
use crate::services::geo::GeoProvider;
use crate::services::side_effects::SideEffectCounters;
use crate::services::token_service::TokenService;
use crate::stores::{SessionStore, UserStore};
use crate::types::db::{session, user};
use crate::types::internal::{AuditAction, AuditEntity, AuditRecord, DeviceInfo, SessionStatus};
use chrono::Utc;

pub const REASON_LOGOUT: &str = "logout";
pub const REASON_USER_REQUEST: &str = "user_request";
pub const REASON_REVOKE_OTHERS: &str = "revoke_others";
pub const REASON_FORCED_LOGOUT: &str = "forced_logout";

/// Session lifecycle orchestration: open on login, validate per request,
/// revoke on logout or administrative action.
pub struct SessionService {
    sessions: SessionStore,
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
    resolver: DeviceResolver,
    geo: Arc<dyn GeoProvider>,
    audit: Arc<AuditTrail>,
    counters: Arc<SideEffectCounters>,
    session_ttl_seconds: i64,
}

impl SessionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: SessionStore,
        users: Arc<UserStore>,
        tokens: Arc<TokenService>,
        resolver: DeviceResolver,
        geo: Arc<dyn GeoProvider>,
        audit: Arc<AuditTrail>,
        counters: Arc<SideEffectCounters>,
        session_ttl_seconds: i64,
    ) -> Self {
        Self {
            sessions,
            users,
            tokens,
            resolver,
            geo,
            audit,
            counters,
            session_ttl_seconds,
        }
    }

    /// Resolve the requesting device, including the best-effort geolocation
    /// leg. A failed lookup degrades to `location: None` and is counted.
    pub async fn resolve_device(&self, ctx: &RequestContext) -> DeviceInfo {
        let mut device = self.resolver.resolve(ctx);
        match self.geo.lookup(&device.ip_address).await {
            Ok(location) => device.location = Some(location),
            Err(e) => {
                self.counters.record_geo_failure();
                warn!(ip = %device.ip_address, error = %e, "Geolocation failed, continuing without location");
            }
        }
        device
    }

    /// Open a session for an already-authenticated user and mint its token.
    pub async fn open(
        &self,
        user: &user::Model,
        device: &DeviceInfo,
    ) -> Result<(session::Model, String), InternalError> {
        let session = self
            .sessions
            .create(&user.id, device, self.session_ttl_seconds)
            .await?;

        let token = self
            .tokens
            .mint(&session.id, session.expires_at)
            .map_err(|e| InternalError::crypto("mint_session_token", e.message()))?;

        info!(user_id = %user.id, session_id = %session.id, device = %device.device_type, "Session opened");

        let location = device
            .location
            .as_ref()
            .map(|l| format!("{}, {}", l.city, l.country))
            .unwrap_or_else(|| "unknown location".to_string());
        self.audit
            .record_and_notify(
                AuditRecord::new(
                    AuditAction::LoginSuccess,
                    AuditEntity::Session,
                    &session.id,
                )
                .actor(&user.id)
                .field("ip_address", &device.ip_address)
                .field("device_type", device.device_type.as_str()),
                &format!(
                    "New sign-in for {} from {} ({})",
                    user.email, device.ip_address, location
                ),
            )
            .await;

        Ok((session, token))
    }

    /// Per-request validation: token to session to user.
    ///
    /// Revocation is checked before expiry, so a session that is both reports
    /// as revoked. A valid hit refreshes `accessed_at`.
    pub async fn authenticate(
        &self,
        token: &str,
    ) -> Result<(session::Model, user::Model), AuthError> {
        let session_id = self.tokens.validate(token)?;

        let session = self
            .sessions
            .find_by_id(&session_id)
            .await
            .map_err(AuthError::from)?
            .ok_or_else(AuthError::unauthenticated)?;

        match session.status(Utc::now().timestamp()) {
            SessionStatus::Revoked => return Err(AuthError::session_revoked()),
            SessionStatus::Expired => return Err(AuthError::session_expired()),
            SessionStatus::Active => {}
        }

        let user = self
            .users
            .get(&session.user_id)
            .await
            .map_err(|_| AuthError::unauthenticated())?;
        if user.is_suspended() {
            return Err(AuthError::unauthenticated());
        }

        let session = self.sessions.touch(session).await.map_err(AuthError::from)?;
        Ok((session, user))
    }

    /// All of the user's sessions, active and historical, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<session::Model>, InternalError> {
        self.sessions.list_for_user(user_id).await
    }

    /// Revoke one of the caller's own sessions. Idempotent.
    pub async fn revoke_own(
        &self,
        actor: &user::Model,
        session_id: &str,
    ) -> Result<session::Model, InternalError> {
        let session = self.sessions.get(session_id).await?;
        if session.user_id != actor.id {
            // Do not reveal whether the session exists
            return Err(InternalError::Session(
                SessionError::NotFound {
                    session_id: session_id.to_owned(),
                },
            ));
        }

        let revoked = self
            .sessions
            .revoke(session_id, Some(REASON_USER_REQUEST))
            .await?;

        self.audit
            .record(
                AuditRecord::new(
                    AuditAction::SessionRevoked,
                    AuditEntity::Session,
                    session_id,
                )
                .actor(&actor.id)
                .field("reason", REASON_USER_REQUEST),
            )
            .await;

        Ok(revoked)
    }

    /// Revoke every other active session of the caller.
    pub async fn revoke_others(
        &self,
        actor: &user::Model,
        current_session_id: &str,
    ) -> Result<u64, InternalError> {
        let revoked = self
            .sessions
            .revoke_all_except(&actor.id, Some(current_session_id), Some(REASON_REVOKE_OTHERS))
            .await?;

        if revoked > 0 {
            self.audit
                .record(
                    AuditRecord::new(
                        AuditAction::SessionsBulkRevoked,
                        AuditEntity::User,
                        &actor.id,
                    )
                    .actor(&actor.id)
                    .field("reason", REASON_REVOKE_OTHERS)
                    .field("revoked_count", revoked),
                )
                .await;
        }

        Ok(revoked)
    }

    /// End the current session.
    pub async fn logout(&self, actor: &user::Model, session_id: &str) -> Result<(), InternalError> {
        self.sessions.revoke(session_id, Some(REASON_LOGOUT)).await?;
        self.audit
            .record(
                AuditRecord::new(
                    AuditAction::Logout,
                    AuditEntity::Session,
                    session_id,
                )
                .actor(&actor.id),
            )
            .await;
        Ok(())
    }

    /// Forced logout of every session a user holds, used when an account is
    /// suspended. Returns the number of sessions revoked.
    pub async fn revoke_all_for_user(
        &self,
        actor_id: &str,
        user_id: &str,
    ) -> Result<u64, InternalError> {
        let revoked = self
            .sessions
            .revoke_all_except(user_id, None, Some(REASON_FORCED_LOGOUT))
            .await?;

        if revoked > 0 {
            self.audit
                .record(
                    AuditRecord::new(
                        AuditAction::SessionsBulkRevoked,
                        AuditEntity::User,
                        user_id,
                    )
                    .actor(actor_id)
                    .field("reason", REASON_FORCED_LOGOUT)
                    .field("revoked_count", revoked),
                )
                .await;
        }

        Ok(revoked)
    }
}
