//! # SMM Assistant
//!
//! Telegram assistant for 3D artists that forwards requests to a
//! text-generation API and relays the answers back to the chat.
//!
//! The assistant scans trends, rewrites post copy, breaks down competitor
//! profiles and sends a daily newsletter to subscribed chats. Model calls
//! go through [`ModelClient`], which retries rate limits and server errors
//! with exponential backoff.
//!
//! ## Example
//!
//! ```rust,no_run
//! use smm_assistant::{ModelClient, ModelConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ModelClient::new(
//!         ModelConfig::default()
//!             .with_api_key("sk-...")
//!             .with_lang("en"),
//!     );
//!
//!     let variants = client.rewrite_copy("Finished my first donut render!").await?;
//!     println!("{}", variants);
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod collector;
pub mod config;
pub mod format;
pub mod model;
pub mod scheduler;
pub mod settings;
pub mod subscription;
pub mod telegram;

pub use bot::{send_daily_broadcast, BroadcastReport, Command, Gateway};
pub use collector::{CompetitorCollector, TrendCollector};
pub use model::{GenerationRequest, ModelClient, ModelConfig, ModelError, Outcome, RetryPolicy};
pub use scheduler::{DailySchedule, DailyTimer, TimerHandle};
pub use settings::{Settings, SettingsError};
pub use subscription::{
    JsonFileSubscriptionStore, MemorySubscriptionStore, SubscriptionError, SubscriptionStore,
};
pub use telegram::{TelegramClient, TelegramError};
