//! Trend collection from an RSS or Atom feed.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

/// Default feed scanned for trends.
pub const DEFAULT_FEED_URL: &str = "https://www.reddit.com/r/blender/hot.rss";

/// Number of feed titles forwarded to the model.
pub const DEFAULT_TITLE_LIMIT: usize = 5;

/// Budget for the feed request in seconds.
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("smm-assistant/", env!("CARGO_PKG_VERSION"));

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<(?:entry|item)\b[^>]*>(.*?)</(?:entry|item)>").expect("valid entry regex")
});
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("valid title regex"));
static CDATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*<!\[CDATA\[(.*?)\]\]>\s*$").expect("valid cdata regex"));
static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x?)([0-9a-fA-F]+);").expect("valid entity regex"));

/// Extract up to `limit` entry titles from an RSS or Atom document.
pub fn parse_feed_titles(xml: &str, limit: usize) -> Vec<String> {
    ENTRY_RE
        .captures_iter(xml)
        .filter_map(|entry| {
            let body = entry.get(1)?.as_str();
            let raw = TITLE_RE.captures(body)?.get(1)?.as_str();
            let title = clean_title(raw);
            (!title.is_empty()).then_some(title)
        })
        .take(limit)
        .collect()
}

fn clean_title(raw: &str) -> String {
    let text = match CDATA_RE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().to_string(),
        None => decode_entities(raw),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let radix = if caps[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&caps[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Label shown above the titles of a feed: the host, or the subreddit name
/// for the default feed.
pub fn source_label_for(feed_url: &str) -> String {
    if feed_url == DEFAULT_FEED_URL {
        return "REDDIT r/blender".to_string();
    }
    let rest = feed_url
        .split_once("://")
        .map_or(feed_url, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    host.trim_start_matches("www.").to_uppercase()
}

/// Collects trend data for the trend analysis task.
pub struct TrendCollector {
    client: Client,
    feed_url: String,
    source_label: String,
    limit: usize,
    timeout: Duration,
    lang: String,
}

impl TrendCollector {
    pub fn new(feed_url: impl Into<String>, lang: impl Into<String>) -> Self {
        let feed_url = feed_url.into();
        Self {
            client: Client::new(),
            source_label: source_label_for(&feed_url),
            feed_url,
            limit: DEFAULT_TITLE_LIMIT,
            timeout: Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECS),
            lang: lang.into(),
        }
    }

    /// Set the label printed above the feed titles.
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Set how many titles are kept.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Set the feed request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Collect trends as a plain-text blob.
    ///
    /// Never fails: when the feed cannot be read or has no entries, a canned
    /// summary of current 3D topics is returned instead.
    pub async fn collect(&self) -> String {
        let header = match self.lang.as_str() {
            "en" => "🔍 COLLECTED TRENDS:",
            _ => "🔍 СОБРАННЫЕ ТРЕНДЫ:",
        };

        match self.fetch_titles().await {
            Ok(titles) if !titles.is_empty() => {
                tracing::info!(count = titles.len(), "Collected feed titles");
                let list = titles
                    .iter()
                    .enumerate()
                    .map(|(i, t)| format!("{}. {}", i + 1, t))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}\n\n📱 {}:\n{}\n", header, self.source_label, list)
            }
            Ok(_) => {
                tracing::warn!(url = %self.feed_url, "Feed has no entries, using placeholder trends");
                format!("{}\n\n{}", header, placeholder_trends(&self.lang))
            }
            Err(e) => {
                tracing::error!(url = %self.feed_url, "Feed request failed: {}", e);
                format!("{}\n\n{}", header, placeholder_trends(&self.lang))
            }
        }
    }

    async fn fetch_titles(&self) -> Result<Vec<String>, reqwest::Error> {
        let response = self
            .client
            .get(&self.feed_url)
            .timeout(self.timeout)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(parse_feed_titles(&body, self.limit))
    }
}

/// Canned trend summary used when no feed data is available.
pub fn placeholder_trends(lang: &str) -> &'static str {
    match lang {
        "en" => PLACEHOLDER_TRENDS_EN,
        _ => PLACEHOLDER_TRENDS_RU,
    }
}

static PLACEHOLDER_TRENDS_RU: &str = "📊 АКТУАЛЬНЫЕ ТЕМЫ В 3D:

1. Нейросети в 3D-моделировании
2. Процедурные материалы и текстуры
3. Real-time рендеринг (Unreal Engine 5, Unity)
4. Стилизованные 3D-персонажи для игр
5. Virtual Production в кино

📱 ПОПУЛЯРНЫЕ ФОРМАТЫ:
- Time-lapse процесса
- Breakdown сложных сцен
- Короткие туториалы
- Сравнения до и после
- Behind the scenes

🎯 ВОСТРЕБОВАННЫЕ НИШИ:
- Архитектурная визуализация
- Предметный дизайн и реклама
- Дизайн персонажей
- Motion graphics
- Игровые ассеты";

static PLACEHOLDER_TRENDS_EN: &str = "📊 CURRENT 3D TOPICS:

1. AI in 3D modeling
2. Procedural materials and textures
3. Real-time rendering (Unreal Engine 5, Unity)
4. Stylized 3D characters for games
5. Virtual production for film

📱 POPULAR FORMATS:
- Process time-lapses
- Breakdowns of complex scenes
- Short tutorials
- Before/after comparisons
- Behind the scenes

🎯 IN-DEMAND NICHES:
- Architectural visualization
- Product design and advertising
- Character design
- Motion graphics
- Game assets";
