//! Minimal Telegram Bot API client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::types::{
    ApiResponse, DeleteMessageRequest, DeleteWebhookRequest, GetUpdatesRequest, Message,
    ReplyKeyboardMarkup, SendMessageRequest, Update,
};

/// Default Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Budget for ordinary Bot API calls.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram client errors.
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),
    #[error("Bot API error {code:?}: {description}")]
    Api {
        code: Option<i32>,
        description: String,
    },
    #[error("Failed to parse Bot API response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs embed the bot token.
        Self::Request(e.without_url())
    }
}

impl TelegramError {
    /// Whether the recipient blocked the bot or no longer exists.
    pub fn is_blocked(&self) -> bool {
        match self {
            Self::Api {
                code: Some(403),
                description,
            } => {
                let description = description.to_lowercase();
                description.contains("blocked") || description.contains("deactivated")
            }
            _ => false,
        }
    }
}

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let text = response.text().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_str(&text).map_err(|e| TelegramError::Parse(e.to_string()))?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code,
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::Parse(format!("{} returned no result", method)))
    }

    /// Long-poll for new updates.
    ///
    /// # Arguments
    /// * `offset` - Identifier of the first update to return.
    /// * `timeout_secs` - Server-side long-poll timeout.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ["message"],
        };
        self.call(
            "getUpdates",
            &request,
            Duration::from_secs(timeout_secs) + Duration::from_secs(10),
        )
        .await
    }

    /// Send an HTML-formatted message and return it as delivered.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
            reply_markup: keyboard,
        };
        self.call("sendMessage", &request, CALL_TIMEOUT).await
    }

    /// Delete a message previously sent by the bot.
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        let request = DeleteMessageRequest {
            chat_id,
            message_id,
        };
        let _: bool = self.call("deleteMessage", &request, CALL_TIMEOUT).await?;
        Ok(())
    }

    /// Remove any webhook so long polling can be used.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TelegramError> {
        let request = DeleteWebhookRequest {
            drop_pending_updates,
        };
        let _: bool = self.call("deleteWebhook", &request, CALL_TIMEOUT).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_updates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/getUpdates"))
            .and(body_partial_json(serde_json::json!({"offset": 10, "timeout": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [
                    {
                        "update_id": 10,
                        "message": {
                            "message_id": 1,
                            "date": 0,
                            "chat": {"id": 77, "type": "private"},
                            "from": {"id": 77, "is_bot": false, "first_name": "A"},
                            "text": "/start"
                        }
                    },
                    {"update_id": 11, "edited_message": {}}
                ]
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "TOKEN");
        let updates = client.get_updates(Some(10), 1).await.unwrap();
        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 77);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert!(updates[1].message.is_none());
    }

    #[tokio::test]
    async fn test_send_message_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 5,
                "text": "<b>hi</b>",
                "parse_mode": "HTML",
                "reply_markup": {"keyboard": [[{"text": "A"}, {"text": "B"}]], "resize_keyboard": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"message_id": 3, "chat": {"id": 5}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::new(format!("{}/", server.uri()), "TOKEN");
        let keyboard = ReplyKeyboardMarkup::from_rows(&[&["A", "B"]]);
        let sent = client
            .send_message(5, "<b>hi</b>", Some(&keyboard))
            .await
            .unwrap();
        assert_eq!(sent.message_id, 3);
        assert_eq!(sent.chat.id, 5);
    }

    #[tokio::test]
    async fn test_delete_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/deleteMessage"))
            .and(body_partial_json(serde_json::json!({"chat_id": 5, "message_id": 3})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        TelegramClient::new(server.uri(), "TOKEN")
            .delete_message(5, 3)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "TOKEN");
        let err = client.send_message(5, "hi", None).await.unwrap_err();
        assert!(err.is_blocked());
    }

    #[tokio::test]
    async fn test_api_error_not_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: can't parse entities"
            })))
            .mount(&server)
            .await;

        let client = TelegramClient::new(server.uri(), "TOKEN");
        let err = client.send_message(5, "<b", None).await.unwrap_err();
        assert!(!err.is_blocked());
        assert!(matches!(err, TelegramError::Api { code: Some(400), .. }));
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let client = TelegramClient::new("http://127.0.0.1:1", "SECRET-TOKEN");
        let err = client.delete_webhook(true).await.unwrap_err();
        assert!(matches!(err, TelegramError::Request(_)));
        assert!(!err.to_string().contains("SECRET-TOKEN"));
    }

    #[tokio::test]
    async fn test_delete_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/deleteWebhook"))
            .and(body_partial_json(serde_json::json!({"drop_pending_updates": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        TelegramClient::new(server.uri(), "TOKEN")
            .delete_webhook(true)
            .await
            .unwrap();
    }
}
