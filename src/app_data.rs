use std::sync::Arc;

use crate::config::{DatabaseConnections, Settings};
use crate::errors::InternalError;
use crate::services::{
    AccessService, AuditTrail, ChatNotifier, DeviceResolver, GeoProvider, IpApiClient,
    MailRelayClient, MailSender, NoopChatNotifier, NoopMailSender, NullGeoProvider,
    SessionService, SideEffectCounters, TelegramClient, TokenService, UserService,
};
use crate::stores::{AccessStore, AuditStore, SessionStore, UserStore};

/// Centralized application wiring, created once in main and shared across
/// the API endpoints.
pub struct AppData {
    pub connections: DatabaseConnections,
    pub counters: Arc<SideEffectCounters>,
    pub audit: Arc<AuditTrail>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionService>,
    pub user_service: Arc<UserService>,
    pub access_service: Arc<AccessService>,
}

impl AppData {
    /// Wire stores and services. Connections must be migrated beforehand.
    pub fn init(settings: &Settings, connections: DatabaseConnections) -> Result<Self, InternalError> {
        tracing::info!("Initializing application wiring");

        let counters = Arc::new(SideEffectCounters::new());

        let notifier: Arc<dyn ChatNotifier> = match &settings.telegram {
            Some(telegram) => Arc::new(TelegramClient::new(
                telegram.bot_token.clone(),
                telegram.chat_id.clone(),
                settings.upstream_timeout,
            )?),
            None => Arc::new(NoopChatNotifier),
        };

        let mail: Arc<dyn MailSender> = match &settings.mail {
            Some(mail) => Arc::new(MailRelayClient::new(
                mail.endpoint.clone(),
                mail.api_key.clone(),
                mail.from_address.clone(),
                settings.upstream_timeout,
            )?),
            None => Arc::new(NoopMailSender),
        };

        let geo: Arc<dyn GeoProvider> = if settings.geo_enabled {
            Arc::new(IpApiClient::new(settings.upstream_timeout)?)
        } else {
            Arc::new(NullGeoProvider)
        };

        let audit = Arc::new(AuditTrail::new(
            AuditStore::new(connections.audit.clone()),
            notifier,
            counters.clone(),
        ));

        let users = Arc::new(UserStore::new(
            connections.identity.clone(),
            settings.password_pepper.clone(),
        ));

        let tokens = Arc::new(TokenService::new(settings.token_secret.clone()));
        let resolver = DeviceResolver::new(settings.fingerprint_key.clone());

        let sessions = Arc::new(SessionService::new(
            SessionStore::new(connections.identity.clone()),
            users.clone(),
            tokens,
            resolver,
            geo,
            audit.clone(),
            counters.clone(),
            settings.session_ttl_seconds,
        ));

        let user_service = Arc::new(UserService::new(
            users.clone(),
            sessions.clone(),
            audit.clone(),
            mail,
            counters.clone(),
        ));

        let access_service = Arc::new(AccessService::new(
            AccessStore::new(connections.identity.clone()),
            users.clone(),
            audit.clone(),
        ));

        tracing::info!("Application wiring complete");

        Ok(Self {
            connections,
            counters,
            audit,
            users,
            sessions,
            user_service,
            access_service,
        })
    }
}
