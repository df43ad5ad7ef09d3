//! Data collectors that enrich model prompts.

mod competitor;
mod trends;

pub use competitor::{normalize_username, CompetitorCollector, MIN_USERNAME_LEN};
pub use trends::{
    parse_feed_titles, placeholder_trends, source_label_for, TrendCollector,
    DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL, DEFAULT_TITLE_LIMIT,
};
