use async_trait::async_trait;
use migration::{AuditMigrator, IdentityMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use labeldesk_backend::errors::internal::UpstreamError;
use labeldesk_backend::services::{
    AccessService, AuditTrail, DeviceResolver, GeoProvider, NoopChatNotifier, NoopMailSender,
    SessionService, SideEffectCounters, TokenService, UserService,
};
use labeldesk_backend::stores::{
    AccessStore, AuditStore, NewUser, SessionStore, UserStore,
};
use labeldesk_backend::types::db::user;
use labeldesk_backend::types::internal::{GeoLocation, Role};

pub const PEPPER: &str = "integration-test-pepper";
pub const TOKEN_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const FINGERPRINT_KEY: &str = "integration-test-fingerprint-key-32ch";
pub const SESSION_TTL: i64 = 30 * 24 * 60 * 60;

/// Deterministic lookup standing in for the upstream geolocation service
pub struct StaticGeoProvider;

#[async_trait]
impl GeoProvider for StaticGeoProvider {
    async fn lookup(&self, _ip: &str) -> Result<GeoLocation, UpstreamError> {
        Ok(GeoLocation {
            city: "Berlin".to_string(),
            region: "Berlin".to_string(),
            country: "Germany".to_string(),
            isp: "TestNet".to_string(),
        })
    }
}

/// Lookup double that always fails, for degraded-path tests
pub struct FailingGeoProvider;

#[async_trait]
impl GeoProvider for FailingGeoProvider {
    async fn lookup(&self, _ip: &str) -> Result<GeoLocation, UpstreamError> {
        Err(UpstreamError::GeoLookup("unreachable".to_string()))
    }
}

pub struct Harness {
    pub identity_db: DatabaseConnection,
    pub audit_db: DatabaseConnection,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionService>,
    pub user_service: Arc<UserService>,
    pub access_service: Arc<AccessService>,
    pub audit: Arc<AuditTrail>,
    pub counters: Arc<SideEffectCounters>,
}

pub async fn harness() -> Harness {
    harness_with_geo(Arc::new(StaticGeoProvider)).await
}

/// Full service wiring over fresh in-memory databases
pub async fn harness_with_geo(geo: Arc<dyn GeoProvider>) -> Harness {
    let identity_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create identity database");
    IdentityMigrator::up(&identity_db, None)
        .await
        .expect("Failed to run identity migrations");

    let audit_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");
    AuditMigrator::up(&audit_db, None)
        .await
        .expect("Failed to run audit migrations");

    let counters = Arc::new(SideEffectCounters::new());
    let audit = Arc::new(AuditTrail::new(
        AuditStore::new(audit_db.clone()),
        Arc::new(NoopChatNotifier),
        counters.clone(),
    ));

    let users = Arc::new(UserStore::new(identity_db.clone(), PEPPER.to_string()));

    let sessions = Arc::new(SessionService::new(
        SessionStore::new(identity_db.clone()),
        users.clone(),
        Arc::new(TokenService::new(TOKEN_SECRET.to_string())),
        DeviceResolver::new(FINGERPRINT_KEY.to_string()),
        geo,
        audit.clone(),
        counters.clone(),
        SESSION_TTL,
    ));

    let user_service = Arc::new(UserService::new(
        users.clone(),
        sessions.clone(),
        audit.clone(),
        Arc::new(NoopMailSender),
        counters.clone(),
    ));

    let access_service = Arc::new(AccessService::new(
        AccessStore::new(identity_db.clone()),
        users.clone(),
        audit.clone(),
    ));

    Harness {
        identity_db,
        audit_db,
        users,
        sessions,
        user_service,
        access_service,
        audit,
        counters,
    }
}

impl Harness {
    /// Approved account with the given role, created through the real
    /// registration path so the password hash verifies.
    pub async fn approved_user(&self, email: &str, password: &str, role: Role) -> user::Model {
        let created = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password: password.to_string(),
                name: "Test User".to_string(),
                phone: None,
                role: Role::User,
            })
            .await
            .expect("Failed to create user");
        self.users
            .approve(&created.id)
            .await
            .expect("Failed to approve user");
        self.users
            .set_role(&created.id, role)
            .await
            .expect("Failed to set role")
    }
}

pub fn desktop_context() -> labeldesk_backend::services::RequestContext {
    labeldesk_backend::services::RequestContext {
        client_fingerprint: None,
        user_agent: Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()),
        forwarded_for: Some("203.0.113.7".to_string()),
        real_ip: None,
        remote_addr: Some("192.0.2.10:50000".to_string()),
    }
}
