//! Daily newsletter delivery to subscribed chats.

use tracing::{error, info, warn};

use crate::config::Messages;
use crate::format::render_reply;
use crate::model::ModelClient;
use crate::subscription::SubscriptionStore;
use crate::telegram::TelegramClient;

/// Result of one broadcast run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
    /// Recipients dropped because they blocked the bot.
    pub removed: usize,
}

/// Generate the daily content once and deliver it to every subscriber.
///
/// Recipients are served one after another. A failed delivery is logged and
/// the batch continues; if the model call fails, every recipient counts as
/// failed and nothing is sent.
pub async fn send_daily_broadcast(
    model: &ModelClient,
    telegram: &TelegramClient,
    store: &dyn SubscriptionStore,
    messages: &Messages,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    let subscribers = match store.list_all() {
        Ok(subscribers) => subscribers,
        Err(e) => {
            error!("Failed to load subscribers: {}", e);
            return report;
        }
    };
    if subscribers.is_empty() {
        info!("No subscribers, skipping daily broadcast");
        return report;
    }

    let content = match model.generate_daily_content().await {
        Ok(content) => content,
        Err(e) => {
            error!(status = ?e.status(), "Daily content generation failed: {}", e);
            report.failed = subscribers.len();
            return report;
        }
    };
    let text = render_reply(messages.daily_header, &content, None, messages.truncated);

    for chat_id in subscribers {
        match telegram.send_message(chat_id, &text, None).await {
            Ok(_) => report.delivered += 1,
            Err(e) if e.is_blocked() => {
                warn!(chat_id, "Recipient blocked the bot, unsubscribing");
                report.failed += 1;
                match store.remove(chat_id) {
                    Ok(_) => report.removed += 1,
                    Err(e) => error!(chat_id, "Failed to remove subscriber: {}", e),
                }
            }
            Err(e) => {
                warn!(chat_id, "Daily delivery failed: {}", e);
                report.failed += 1;
            }
        }
    }

    info!(
        delivered = report.delivered,
        failed = report.failed,
        removed = report.removed,
        "Daily broadcast finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MESSAGES_EN;
    use crate::model::{ModelConfig, RetryPolicy};
    use crate::subscription::MemorySubscriptionStore;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer) -> ModelClient {
        ModelClient::new(
            ModelConfig::default()
                .with_api_url(format!("{}/v1/messages", server.uri()))
                .with_api_key("test-key")
                .with_lang("en")
                .with_retry(
                    RetryPolicy::default()
                        .with_max_attempts(1)
                        .with_backoff_unit(Duration::from_millis(1)),
                ),
        )
    }

    fn sent_ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {"message_id": 1, "chat": {"id": 0}}
        }))
    }

    #[tokio::test]
    async fn test_no_subscribers_skips_model_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(sent_ok())
            .expect(0)
            .mount(&server)
            .await;

        let store = MemorySubscriptionStore::new();
        let report = send_daily_broadcast(
            &model_for(&server),
            &TelegramClient::new(server.uri(), "TOKEN"),
            &store,
            &MESSAGES_EN,
        )
        .await;
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_delivery_continues_after_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"content": [{"type": "text", "text": "Idea of the day"}]}),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({"chat_id": 1})))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({"chat_id": 2})))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({"chat_id": 3})))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;

        let store = MemorySubscriptionStore::with_subscribers([3, 1, 2]);
        let report = send_daily_broadcast(
            &model_for(&server),
            &TelegramClient::new(server.uri(), "TOKEN"),
            &store,
            &MESSAGES_EN,
        )
        .await;

        assert_eq!(
            report,
            BroadcastReport {
                delivered: 1,
                failed: 2,
                removed: 1
            }
        );
        assert_eq!(store.list_all().unwrap(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_generation_failure_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .respond_with(sent_ok())
            .expect(0)
            .mount(&server)
            .await;

        let store = MemorySubscriptionStore::with_subscribers([1, 2]);
        let report = send_daily_broadcast(
            &model_for(&server),
            &TelegramClient::new(server.uri(), "TOKEN"),
            &store,
            &MESSAGES_EN,
        )
        .await;
        assert_eq!(report.failed, 2);
        assert_eq!(report.delivered, 0);
        assert_eq!(store.list_all().unwrap().len(), 2);
    }
}
