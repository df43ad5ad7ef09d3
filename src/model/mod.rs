//! Model client module for text generation.

mod client;
mod tasks;

pub use client::{
    GenerationRequest, MessagesRequest, ModelClient, ModelConfig, ModelError, Outcome,
    RetryPolicy, WireMessage, API_VERSION, DEFAULT_API_URL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TRANSPORT_DELAY_SECS,
};
