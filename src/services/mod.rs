// Services layer - Business logic orchestration
pub mod access_service;
pub mod audit_logger;
pub mod authorizer;
pub mod device_resolver;
pub mod geo;
pub mod notify;
pub mod session_service;
pub mod side_effects;
pub mod token_service;
pub mod user_service;

pub use access_service::AccessService;
pub use audit_logger::AuditTrail;
pub use authorizer::Authorizer;
pub use device_resolver::{DeviceResolver, RequestContext};
pub use geo::{GeoProvider, IpApiClient, NullGeoProvider};
pub use notify::{ChatNotifier, MailRelayClient, MailSender, NoopChatNotifier, NoopMailSender, TelegramClient};
pub use session_service::SessionService;
pub use side_effects::SideEffectCounters;
pub use token_service::TokenService;
pub use user_service::UserService;
