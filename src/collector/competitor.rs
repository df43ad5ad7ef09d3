//! Competitor profile data for the competitor analysis task.
//!
//! No social platform API is wired in, so profiles are synthetic examples
//! built around the requested handle.

/// Minimum handle length accepted after normalization.
pub const MIN_USERNAME_LEN: usize = 2;

/// Normalize a handle or profile link into a bare username.
///
/// Accepts `@name`, `name`, and links such as `https://twitter.com/name/`.
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);

    let last = without_query
        .split('/')
        .rfind(|s| !s.is_empty())
        .unwrap_or("");
    let name = last.trim_start_matches('@');

    if name.chars().count() < MIN_USERNAME_LEN || name.chars().any(char::is_whitespace) {
        None
    } else {
        Some(name.to_string())
    }
}

/// Builds the profile summary forwarded to the model.
#[derive(Debug, Clone)]
pub struct CompetitorCollector {
    lang: String,
}

impl CompetitorCollector {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    /// Profile summary for a normalized username.
    pub fn profile(&self, username: &str) -> String {
        let template = match self.lang.as_str() {
            "en" => PROFILE_TEMPLATE_EN,
            _ => PROFILE_TEMPLATE_RU,
        };
        template.replace("{username}", username)
    }
}

static PROFILE_TEMPLATE_RU: &str = r#"📊 ПРОФИЛЬ: @{username}

ПРИМЕРЫ ПОСТОВ:

Пост 1: "Just finished this cyberpunk scene in Blender 💜 #3D #blender"
- Вовлеченность: 1 200 лайков, 45 комментариев
- Формат: изображение и короткий текст
- Время: 18:00

Пост 2: "Time-lapse of my latest character modeling 🎨"
- Вовлеченность: 2 300 лайков, 78 комментариев
- Формат: видео (30 сек)
- Время: 20:00

Пост 3: "Tutorial: How to create realistic skin shader ✨"
- Вовлеченность: 890 лайков, 34 комментария
- Формат: карусель / тред
- Время: 15:00

ПАТТЕРНЫ ПОСТИНГА:
- Частота: 3-4 раза в неделю
- Лучшие дни: вторник, четверг, воскресенье
- Лучшее время: 18:00-21:00
- Активно использует эмодзи
- Хештеги: #3D #Blender #3DArt #CGI #DigitalArt

ФОРМАТЫ:
- 40% статичные рендеры
- 35% time-lapse видео
- 25% туториалы и breakdown

ТЕМЫ:
- Персонажи: 30%
- Окружение: 25%
- Abstract/Motion: 20%
- Туториалы: 25%

Примечание: данные демонстрационные, для реального анализа нужен API платформы.
"#;

static PROFILE_TEMPLATE_EN: &str = r#"📊 PROFILE: @{username}

SAMPLE POSTS:

Post 1: "Just finished this cyberpunk scene in Blender 💜 #3D #blender"
- Engagement: 1,200 likes, 45 comments
- Format: image with short text
- Time: 18:00

Post 2: "Time-lapse of my latest character modeling 🎨"
- Engagement: 2,300 likes, 78 comments
- Format: video (30 sec)
- Time: 20:00

Post 3: "Tutorial: How to create realistic skin shader ✨"
- Engagement: 890 likes, 34 comments
- Format: carousel / thread
- Time: 15:00

POSTING PATTERNS:
- Frequency: 3-4 times a week
- Best days: Tuesday, Thursday, Sunday
- Best time: 18:00-21:00
- Uses emoji heavily
- Hashtags: #3D #Blender #3DArt #CGI #DigitalArt

FORMATS:
- 40% still renders
- 35% time-lapse videos
- 25% tutorials and breakdowns

TOPICS:
- Characters: 30%
- Environments: 25%
- Abstract/Motion: 20%
- Tutorials: 25%

Note: demonstration data, a real analysis needs the platform API.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("@artist"), Some("artist".to_string()));
        assert_eq!(normalize_username("  artist "), Some("artist".to_string()));
        assert_eq!(
            normalize_username("https://twitter.com/artist"),
            Some("artist".to_string())
        );
        assert_eq!(
            normalize_username("http://x.com/@artist/?ref=abc"),
            Some("artist".to_string())
        );
        assert_eq!(
            normalize_username("www.instagram.com/artist_3d/"),
            Some("artist_3d".to_string())
        );
    }

    #[test]
    fn test_normalize_rejects_short_or_empty() {
        assert_eq!(normalize_username("@a"), None);
        assert_eq!(normalize_username(""), None);
        assert_eq!(normalize_username("https://"), None);
        assert_eq!(normalize_username("two words"), None);
    }

    #[test]
    fn test_profile_interpolates_username() {
        let collector = CompetitorCollector::new("en");
        let profile = collector.profile("pixelsmith");
        assert!(profile.starts_with("📊 PROFILE: @pixelsmith"));
        assert!(!profile.contains("{username}"));

        let ru = CompetitorCollector::new("ru").profile("pixelsmith");
        assert!(ru.contains("@pixelsmith"));
    }
}
