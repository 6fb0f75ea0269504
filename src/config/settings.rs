use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 3000;
const MIN_SECRET_LEN: usize = 32;

/// Telegram operator-notification settings; absent means notifications are
/// disabled for this deployment.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}

/// Mail relay settings; absent disables approval mails.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub endpoint: String,
    pub api_key: String,
    pub from_address: String,
}

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub database_url: String,
    pub audit_database_url: String,

    pub token_secret: String,
    pub password_pepper: String,
    pub fingerprint_key: String,

    pub session_ttl_seconds: i64,

    pub geo_enabled: bool,
    pub upstream_timeout: Duration,

    pub telegram: Option<TelegramSettings>,
    pub mail: Option<MailSettings>,

    pub log_dir: Option<String>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn required_secret(name: &'static str) -> Result<String, ConfigError> {
    let value = required(name)?;
    if value.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            name,
            message: format!("must be at least {} characters", MIN_SECRET_LEN),
        });
    }
    Ok(value)
}

impl Settings {
    pub fn from_env() -> Result<Settings, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        // The audit trail may live in its own database; default to sharing
        let audit_database_url =
            env::var("AUDIT_DATABASE_URL").unwrap_or_else(|_| database_url.clone());

        let session_ttl_days = match env::var("SESSION_TTL_DAYS") {
            Ok(raw) => raw.parse::<i64>().map_err(|e| ConfigError::Invalid {
                name: "SESSION_TTL_DAYS",
                message: e.to_string(),
            })?,
            Err(_) => DEFAULT_SESSION_TTL_DAYS,
        };
        if session_ttl_days <= 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_DAYS",
                message: "must be positive".to_string(),
            });
        }

        let timeout_ms = match env::var("UPSTREAM_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_MS",
                message: e.to_string(),
            })?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_MS,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                message: e.to_string(),
            })?,
            Err(_) => 3000,
        };

        let telegram = match (env::var("TELEGRAM_BOT_TOKEN"), env::var("TELEGRAM_CHAT_ID")) {
            (Ok(bot_token), Ok(chat_id)) => Some(TelegramSettings { bot_token, chat_id }),
            _ => None,
        };

        let mail = match (
            env::var("MAIL_RELAY_URL"),
            env::var("MAIL_RELAY_API_KEY"),
            env::var("MAIL_FROM"),
        ) {
            (Ok(endpoint), Ok(api_key), Ok(from_address)) => Some(MailSettings {
                endpoint,
                api_key,
                from_address,
            }),
            _ => None,
        };

        Ok(Settings {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url,
            audit_database_url,
            token_secret: required_secret("TOKEN_SECRET")?,
            password_pepper: required_secret("PASSWORD_PEPPER")?,
            fingerprint_key: required_secret("FINGERPRINT_KEY")?,
            session_ttl_seconds: session_ttl_days * 24 * 60 * 60,
            geo_enabled: env::var("GEO_ENABLED").map(|v| v != "false").unwrap_or(true),
            upstream_timeout: Duration::from_millis(timeout_ms),
            telegram,
            mail,
            log_dir: env::var("LOG_DIR").ok(),
        })
    }
}
