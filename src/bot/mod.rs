//! Telegram bot front end: command parsing, the polling gateway and the
//! daily broadcast.

mod broadcast;
mod command;
mod gateway;

pub use broadcast::{send_daily_broadcast, BroadcastReport};
pub use command::Command;
pub use gateway::{
    main_keyboard, Gateway, DEFAULT_POLL_TIMEOUT_SECS, MAX_REWRITE_CHARS, MIN_REWRITE_CHARS,
};
