//! Runtime settings for the assistant.
//! Read from the process environment, after `dotenvy` has loaded any `.env` file.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, NaiveTime};
use thiserror::Error;

use crate::collector::DEFAULT_FEED_URL;
use crate::model::{
    ModelConfig, RetryPolicy, DEFAULT_API_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use crate::scheduler::{parse_daily_time, parse_utc_offset, DailySchedule};
use crate::subscription::{
    JsonFileSubscriptionStore, MemorySubscriptionStore, SubscriptionError, SubscriptionStore,
    DEFAULT_SUBSCRIBERS_FILE,
};
use crate::telegram::DEFAULT_TELEGRAM_API_URL;

/// Settings errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where subscribers are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionBackend {
    /// Lost on restart.
    Memory,
    /// JSON array of chat ids at the given path.
    File(PathBuf),
}

/// Application settings.
#[derive(Clone)]
pub struct Settings {
    /// Telegram bot token
    pub telegram_token: String,
    /// Telegram Bot API base URL
    pub telegram_api_url: String,
    /// Long-poll timeout for getUpdates in seconds
    pub poll_timeout_secs: u64,
    /// Model API key
    pub api_key: String,
    /// Model API endpoint
    pub api_url: String,
    /// Model name
    pub model_name: String,
    /// Output token ceiling
    pub max_tokens: u32,
    /// Attempts per model request
    pub max_attempts: u32,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Language code ("ru" or "en")
    pub lang: String,
    /// Local time of the daily broadcast
    pub notification_time: NaiveTime,
    /// UTC offset the broadcast time is expressed in
    pub utc_offset: FixedOffset,
    /// Chat ids subscribed at start-up
    pub seed_subscribers: Vec<i64>,
    /// Subscriber storage
    pub subscription_backend: SubscriptionBackend,
    /// Feed used by the trend scanner
    pub trends_feed_url: String,
    /// Label printed above the feed titles
    pub trends_source_label: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("telegram_token", &"<redacted>")
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("max_attempts", &self.max_attempts)
            .field("timeout_secs", &self.timeout_secs)
            .field("lang", &self.lang)
            .field("notification_time", &self.notification_time)
            .field("utc_offset", &self.utc_offset)
            .field("seed_subscribers", &self.seed_subscribers)
            .field("subscription_backend", &self.subscription_backend)
            .field("trends_feed_url", &self.trends_feed_url)
            .field("trends_source_label", &self.trends_source_label)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(SettingsError::Missing(key));

        let lang = get("BOT_LANG").unwrap_or_else(|| "ru".to_string());
        if lang != "ru" && lang != "en" {
            return Err(SettingsError::Invalid {
                key: "BOT_LANG",
                reason: format!("unsupported language '{}'", lang),
            });
        }

        let notification_time = match get("NOTIFICATION_TIME") {
            Some(v) => parse_daily_time(&v).map_err(|e| SettingsError::Invalid {
                key: "NOTIFICATION_TIME",
                reason: e.to_string(),
            })?,
            None => NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        };

        let utc_offset = parse_utc_offset(
            &get("NOTIFICATION_UTC_OFFSET").unwrap_or_else(|| "+03:00".to_string()),
        )
        .map_err(|e| SettingsError::Invalid {
            key: "NOTIFICATION_UTC_OFFSET",
            reason: e.to_string(),
        })?;

        let subscription_backend = match get("SUBSCRIPTION_STORE").as_deref() {
            None | Some("file") => SubscriptionBackend::File(PathBuf::from(
                get("SUBSCRIBERS_FILE").unwrap_or_else(|| DEFAULT_SUBSCRIBERS_FILE.to_string()),
            )),
            Some("memory") => SubscriptionBackend::Memory,
            Some(other) => {
                return Err(SettingsError::Invalid {
                    key: "SUBSCRIPTION_STORE",
                    reason: format!("expected 'file' or 'memory', got '{}'", other),
                })
            }
        };

        Ok(Self {
            telegram_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            poll_timeout_secs: parse_number(&get, "POLL_TIMEOUT_SECS", 30)?,
            api_key: required("CLAUDE_API_KEY")?,
            api_url: get("CLAUDE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model_name: get("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_number(&get, "CLAUDE_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            max_attempts: parse_number(&get, "CLAUDE_MAX_RETRIES", DEFAULT_MAX_ATTEMPTS)?,
            timeout_secs: parse_number(&get, "CLAUDE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            lang,
            notification_time,
            utc_offset,
            seed_subscribers: parse_user_list(&get("NOTIFICATION_USERS").unwrap_or_default())
                .map_err(|reason| SettingsError::Invalid {
                    key: "NOTIFICATION_USERS",
                    reason,
                })?,
            subscription_backend,
            trends_feed_url: get("TRENDS_FEED_URL")
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            trends_source_label: get("TRENDS_SOURCE_LABEL"),
        })
    }

    /// Model client configuration derived from these settings.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::default()
            .with_api_url(&self.api_url)
            .with_api_key(&self.api_key)
            .with_model_name(&self.model_name)
            .with_max_tokens(self.max_tokens)
            .with_lang(&self.lang)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(RetryPolicy::default().with_max_attempts(self.max_attempts))
    }

    /// Open the configured subscriber store and add the seed subscribers.
    pub fn open_subscription_store(&self) -> Result<Arc<dyn SubscriptionStore>, SubscriptionError> {
        let store: Arc<dyn SubscriptionStore> = match &self.subscription_backend {
            SubscriptionBackend::Memory => Arc::new(MemorySubscriptionStore::new()),
            SubscriptionBackend::File(path) => Arc::new(JsonFileSubscriptionStore::open(path)?),
        };
        for chat_id in &self.seed_subscribers {
            store.add(*chat_id)?;
        }
        Ok(store)
    }

    /// Schedule of the daily broadcast.
    pub fn daily_schedule(&self) -> DailySchedule {
        DailySchedule::new(self.notification_time, self.utc_offset)
    }
}

fn parse_number<T, G>(get: &G, key: &'static str, default: T) -> Result<T, SettingsError>
where
    T: std::str::FromStr + PartialOrd + Default,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<T>() {
            Ok(v) if v > T::default() => Ok(v),
            _ => Err(SettingsError::Invalid {
                key,
                reason: format!("expected a positive number, got '{}'", raw),
            }),
        },
    }
}

/// Parse a comma-separated list of chat ids.
pub fn parse_user_list(raw: &str) -> Result<Vec<i64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|_| format!("'{}' is not a chat id", s)))
        .collect()
}
