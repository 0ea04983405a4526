//! Telegram Bot API message sink.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use serde::Serialize;

use super::format::MessageFormat;
use crate::config::DISPATCH_TIMEOUT_SECS;
use crate::error_handling::DispatchError;

/// Delivers reminder text somewhere.
///
/// `send` never fails loudly: it logs and returns `false` so one failed
/// delivery cannot abort the other records.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, text: &str) -> bool;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

/// Posts to `{api_base}/bot{token}/sendMessage`.
pub struct TelegramMessenger {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
    format: MessageFormat,
    timeout: Duration,
}

impl TelegramMessenger {
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        token: &str,
        chat_id: &str,
        format: MessageFormat,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
            format,
            timeout: Duration::from_secs(DISPATCH_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn format(&self) -> MessageFormat {
        self.format
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    /// Sends `text` and reports why delivery failed.
    ///
    /// # Errors
    ///
    /// - `DispatchError::Request` on network failure or timeout
    /// - `DispatchError::Status` on a non-2xx response
    /// - `DispatchError::Rejected` when the API answers `"ok": false`
    pub async fn try_send(&self, text: &str) -> Result<(), DispatchError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: self.format.parse_mode(),
            disable_web_page_preview: true,
        };
        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            // The token is part of the URL.
            .map_err(|e| DispatchError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }
        // A 2xx body that isn't JSON is taken as delivered.
        if let Ok(body) = response.json::<serde_json::Value>().await {
            if body["ok"] == serde_json::Value::Bool(false) {
                let description = body["description"]
                    .as_str()
                    .unwrap_or("no description")
                    .to_string();
                return Err(DispatchError::Rejected(description));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, text: &str) -> bool {
        match self.try_send(text).await {
            Ok(()) => {
                debug!("Telegram message delivered to chat {}", self.chat_id);
                true
            }
            Err(e) => {
                error!("Telegram delivery failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_omits_parse_mode_for_plain() {
        let payload = SendMessage {
            chat_id: "42",
            text: "hi",
            parse_mode: MessageFormat::Plain.parse_mode(),
            disable_web_page_preview: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chat_id"], "42");
        assert!(json.get("parse_mode").is_none());
    }

    #[test]
    fn test_endpoint_includes_token() {
        let messenger = TelegramMessenger::new(
            reqwest::Client::new(),
            "https://api.telegram.org/",
            "123:abc",
            "42",
            MessageFormat::MarkdownV2,
        );
        assert_eq!(
            messenger.endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
