//! Configuration module for the assistant: prompts and bot messages.

mod i18n;
mod prompts;

pub use i18n::{get_messages, Messages, MESSAGES_EN, MESSAGES_RU};
pub use prompts::{get_task_prompt, TaskKind, TaskPrompt, INPUT_MARKER, PROMPTS_EN, PROMPTS_RU};
