use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery capability used by the notification dispatcher.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Returns the transport's message id.
    async fn send(&self, email: OutboundEmail) -> anyhow::Result<String>;
}

/// Posts messages as JSON to an HTTP mail API.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: String, from: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl MailSender for HttpMailer {
    async fn send(&self, email: OutboundEmail) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": email.to,
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Mail API error {}: {}", status, body);
        }

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, to = %email.to, "Mail API accepted the message but its response was not JSON");
                serde_json::Value::Null
            }
        };
        let message_id = message_id_from(&body);

        tracing::info!(to = %email.to, subject = %email.subject, message_id = %message_id, "Email sent");
        Ok(message_id)
    }
}

/// The transport's id when it reports one, otherwise a local id.
fn message_id_from(body: &serde_json::Value) -> String {
    body["id"]
        .as_str()
        .or_else(|| body["messageId"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            tracing::warn!("Mail API response carried no message id; using a local one");
            Uuid::new_v4().to_string()
        })
}

/// Records messages in the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl MailSender for LogMailer {
    async fn send(&self, email: OutboundEmail) -> anyhow::Result<String> {
        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            message_id = %message_id,
            "Mail API not configured; email logged only"
        );
        Ok(message_id)
    }
}

pub fn from_config(config: &Config) -> anyhow::Result<Box<dyn MailSender>> {
    match &config.mail_api_url {
        Some(url) => Ok(Box::new(HttpMailer::new(
            url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )?)),
        None => Ok(Box::new(LogMailer)),
    }
}
