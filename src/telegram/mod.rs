//! Telegram Bot API transport for the chat gateway.

mod api;
mod types;

pub use api::{TelegramClient, TelegramError, DEFAULT_TELEGRAM_API_URL};
pub use types::{ApiResponse, Chat, KeyboardButton, Message, ReplyKeyboardMarkup, Update, User};
