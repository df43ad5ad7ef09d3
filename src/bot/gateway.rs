//! Chat gateway: turns Telegram updates into model tasks and replies.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::collector::{normalize_username, CompetitorCollector, TrendCollector, DEFAULT_FEED_URL};
use crate::config::{get_messages, Messages};
use crate::format::{escape_html, render_reply};
use crate::model::{ModelClient, Outcome};
use crate::subscription::SubscriptionStore;
use crate::telegram::{ReplyKeyboardMarkup, TelegramClient, Update};

use super::command::Command;

/// Accepted length of a text sent to the copywriter, in characters.
pub const MIN_REWRITE_CHARS: usize = 10;
pub const MAX_REWRITE_CHARS: usize = 2000;

/// Default server-side long-poll timeout.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed getUpdates call.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Work that needs a model call.
#[derive(Debug, Clone, PartialEq)]
enum ModelJob {
    Trends,
    Rewrite(String),
    Competitor(String),
}

/// What to do with a parsed command.
#[derive(Debug, Clone, PartialEq)]
enum Plan {
    Reply(String),
    Model {
        working: &'static str,
        job: ModelJob,
    },
}

/// Telegram front end of the assistant.
pub struct Gateway {
    model: Arc<ModelClient>,
    telegram: TelegramClient,
    store: Arc<dyn SubscriptionStore>,
    trends: TrendCollector,
    competitors: CompetitorCollector,
    messages: &'static Messages,
    keyboard: ReplyKeyboardMarkup,
    notify_time: String,
    poll_timeout_secs: u64,
}

impl Gateway {
    /// Create a gateway speaking the model's configured language.
    pub fn new(
        model: Arc<ModelClient>,
        telegram: TelegramClient,
        store: Arc<dyn SubscriptionStore>,
    ) -> Self {
        let lang = model.config().lang.clone();
        let messages = get_messages(&lang);
        Self {
            model,
            telegram,
            store,
            trends: TrendCollector::new(DEFAULT_FEED_URL, &lang),
            competitors: CompetitorCollector::new(&lang),
            messages,
            keyboard: main_keyboard(messages),
            notify_time: "09:00".to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Replace the trend collector.
    pub fn with_trend_collector(mut self, trends: TrendCollector) -> Self {
        self.trends = trends;
        self
    }

    /// Set the broadcast time shown to new subscribers.
    pub fn with_notify_time(mut self, label: impl Into<String>) -> Self {
        self.notify_time = label.into();
        self
    }

    /// Set the long-poll timeout.
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    fn plan(&self, chat_id: i64, command: &Command) -> Plan {
        let m = self.messages;
        match command {
            Command::Start => Plan::Reply(m.welcome.to_string()),
            Command::Trends => Plan::Model {
                working: m.trends_working,
                job: ModelJob::Trends,
            },
            Command::Rewrite(None) => Plan::Reply(m.rewrite_usage.to_string()),
            Command::Rewrite(Some(text)) => {
                let len = text.chars().count();
                if len < MIN_REWRITE_CHARS {
                    Plan::Reply(m.text_too_short.to_string())
                } else if len > MAX_REWRITE_CHARS {
                    Plan::Reply(m.text_too_long.to_string())
                } else {
                    Plan::Model {
                        working: m.rewrite_working,
                        job: ModelJob::Rewrite(text.clone()),
                    }
                }
            }
            Command::Competitor(None) => Plan::Reply(m.competitor_usage.to_string()),
            Command::Competitor(Some(raw)) => match normalize_username(raw) {
                Some(username) => Plan::Model {
                    working: m.competitor_working,
                    job: ModelJob::Competitor(username),
                },
                None => Plan::Reply(m.invalid_username.to_string()),
            },
            Command::Notify => Plan::Reply(self.toggle_subscription(chat_id)),
            Command::Unknown => Plan::Reply(m.unknown_command.to_string()),
        }
    }

    fn toggle_subscription(&self, chat_id: i64) -> String {
        match self.store.toggle(chat_id) {
            Ok(true) => {
                info!(chat_id, "Subscribed to daily tips");
                self.messages.subscribed.replace("{time}", &self.notify_time)
            }
            Ok(false) => {
                info!(chat_id, "Unsubscribed from daily tips");
                self.messages.unsubscribed.to_string()
            }
            Err(e) => {
                error!(chat_id, "Failed to toggle subscription: {}", e);
                self.messages.subscription_failed.to_string()
            }
        }
    }

    async fn run_job(&self, chat_id: i64, job: &ModelJob) -> String {
        let m = self.messages;
        match job {
            ModelJob::Trends => {
                let data = self.trends.collect().await;
                let outcome = self.model.analyze_trends(&data).await;
                self.render(chat_id, outcome, m.trends_header, Some(m.trends_next_steps))
            }
            ModelJob::Rewrite(text) => {
                let outcome = self.model.rewrite_copy(text).await;
                self.render(chat_id, outcome, m.rewrite_header, None)
            }
            ModelJob::Competitor(username) => {
                let profile = self.competitors.profile(username);
                let outcome = self.model.analyze_competitor(&profile).await;
                let header = format!("{}\n@{}", m.competitor_header, escape_html(username));
                self.render(chat_id, outcome, &header, None)
            }
        }
    }

    fn render(&self, chat_id: i64, outcome: Outcome, header: &str, footer: Option<&str>) -> String {
        match outcome {
            Ok(text) => render_reply(header, &text, footer, self.messages.truncated),
            Err(e) => {
                error!(chat_id, status = ?e.status(), "Model request failed: {}", e);
                self.messages.model_failed.to_string()
            }
        }
    }

    /// Final reply text for a command, without the intermediate
    /// "working" message.
    pub async fn reply_for(&self, chat_id: i64, command: &Command) -> String {
        match self.plan(chat_id, command) {
            Plan::Reply(text) => text,
            Plan::Model { job, .. } => self.run_job(chat_id, &job).await,
        }
    }

    /// Send a message, returning its id on success.
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboardMarkup>,
    ) -> Option<i64> {
        match self.telegram.send_message(chat_id, text, keyboard).await {
            Ok(sent) => Some(sent.message_id),
            Err(e) => {
                warn!(chat_id, "Failed to send message: {}", e);
                None
            }
        }
    }

    /// Handle one update. Errors are logged, never returned.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };
        let chat_id = message.chat.id;
        let command = Command::parse(&text, self.messages);
        debug!(chat_id, ?command, "Received command");

        match self.plan(chat_id, &command) {
            Plan::Reply(reply) => {
                let keyboard = matches!(command, Command::Start).then_some(&self.keyboard);
                self.send(chat_id, &reply, keyboard).await;
            }
            Plan::Model { working, job } => {
                let working_id = self.send(chat_id, working, None).await;
                let reply = self.run_job(chat_id, &job).await;
                if let Some(message_id) = working_id {
                    if let Err(e) = self.telegram.delete_message(chat_id, message_id).await {
                        debug!(chat_id, "Failed to delete working message: {}", e);
                    }
                }
                self.send(chat_id, &reply, None).await;
            }
        }
    }

    /// Long-poll Telegram until `shutdown` resolves.
    ///
    /// Each update is handled on its own task so a slow model call does not
    /// hold up other chats.
    pub async fn run<S>(self: Arc<Self>, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset: Option<i64> = None;
        info!("Gateway polling for updates");

        loop {
            let result = tokio::select! {
                _ = &mut shutdown => break,
                result = self.telegram.get_updates(offset, self.poll_timeout_secs) => result,
            };

            match result {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let gateway = Arc::clone(&self);
                        tokio::spawn(async move { gateway.handle_update(update).await });
                    }
                }
                Err(e) => {
                    warn!("getUpdates failed: {}", e);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => {}
                    }
                }
            }
        }

        info!("Gateway stopped");
    }
}

/// Reply keyboard with the four menu buttons.
pub fn main_keyboard(messages: &Messages) -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup::from_rows(&[
        &[messages.button_trends, messages.button_copywriter],
        &[messages.button_competitors, messages.button_notifications],
    ])
}
