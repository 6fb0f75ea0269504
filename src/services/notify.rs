use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::errors::internal::UpstreamError;

/// Operator chat notifications for security-relevant events (new logins,
/// revocations, access changes). Delivery is best-effort.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), UpstreamError>;
}

/// Transactional mail to end users (account approval notices).
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), UpstreamError>;
}

/// Telegram Bot API client for operator notifications.
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(
        bot_token: String,
        chat_id: String,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        Self::with_base_url(
            "https://api.telegram.org".to_string(),
            bot_token,
            chat_id,
            timeout,
        )
    }

    pub fn with_base_url(
        base_url: String,
        bot_token: String,
        chat_id: String,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            bot_token,
            chat_id,
        })
    }
}

#[async_trait]
impl ChatNotifier for TelegramClient {
    async fn send(&self, text: &str) -> Result<(), UpstreamError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Notification(format!(
                "Telegram responded {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// HTTP mail relay client. Posts a JSON envelope to a relay endpoint that
/// handles actual SMTP delivery.
pub struct MailRelayClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

impl MailRelayClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        from_address: String,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            from_address,
        })
    }
}

#[async_trait]
impl MailSender for MailRelayClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from_address,
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Notification(format!(
                "Mail relay responded {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// No-op implementations for deployments without the integrations configured.
pub struct NoopChatNotifier;

#[async_trait]
impl ChatNotifier for NoopChatNotifier {
    async fn send(&self, _text: &str) -> Result<(), UpstreamError> {
        Ok(())
    }
}

pub struct NoopMailSender;

#[async_trait]
impl MailSender for NoopMailSender {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), UpstreamError> {
        Ok(())
    }
}
