//! SMM Assistant - Telegram bot entry point.
//!
//! Run with: cargo run --bin smm-assistant

use std::sync::Arc;

use smm_assistant::collector::TrendCollector;
use smm_assistant::config::get_messages;
use smm_assistant::{send_daily_broadcast, DailyTimer, Gateway, ModelClient, Settings, TelegramClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(?settings, "Loaded settings");

    let model = Arc::new(ModelClient::new(settings.model_config()));
    let telegram = TelegramClient::new(&settings.telegram_api_url, &settings.telegram_token);
    let store = settings.open_subscription_store()?;
    let messages = get_messages(&settings.lang);

    telegram.delete_webhook(false).await?;

    let timer = {
        let model = Arc::clone(&model);
        let telegram = telegram.clone();
        let store = Arc::clone(&store);
        DailyTimer::spawn(settings.daily_schedule(), move || {
            let model = Arc::clone(&model);
            let telegram = telegram.clone();
            let store = Arc::clone(&store);
            async move {
                send_daily_broadcast(&model, &telegram, store.as_ref(), messages).await;
            }
        })
    };

    let mut trends = TrendCollector::new(&settings.trends_feed_url, &settings.lang);
    if let Some(label) = &settings.trends_source_label {
        trends = trends.with_source_label(label);
    }

    let gateway = Gateway::new(model, telegram, store)
        .with_trend_collector(trends)
        .with_notify_time(settings.notification_time.format("%H:%M").to_string())
        .with_poll_timeout(settings.poll_timeout_secs);

    println!("🎨 SMM Assistant started, press Ctrl+C to stop");

    Arc::new(gateway)
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await;

    timer.shutdown().await;
    println!("👋 Bye");
    Ok(())
}
