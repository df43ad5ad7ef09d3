//! Internationalization (i18n) module for bot messages.

/// Bot messages structure
#[derive(Debug, Clone)]
pub struct Messages {
    pub welcome: &'static str,
    pub button_trends: &'static str,
    pub button_copywriter: &'static str,
    pub button_competitors: &'static str,
    pub button_notifications: &'static str,
    pub trends_working: &'static str,
    pub trends_header: &'static str,
    pub trends_next_steps: &'static str,
    pub rewrite_usage: &'static str,
    pub rewrite_working: &'static str,
    pub rewrite_header: &'static str,
    pub text_too_short: &'static str,
    pub text_too_long: &'static str,
    pub competitor_usage: &'static str,
    pub competitor_working: &'static str,
    pub competitor_header: &'static str,
    pub invalid_username: &'static str,
    /// Contains a `{time}` placeholder.
    pub subscribed: &'static str,
    pub unsubscribed: &'static str,
    pub subscription_failed: &'static str,
    pub daily_header: &'static str,
    pub model_failed: &'static str,
    pub unknown_command: &'static str,
    pub truncated: &'static str,
}

/// Russian messages
pub static MESSAGES_RU: Messages = Messages {
    welcome: "🎨 <b>3D SMM Assistant</b>\n\n\
        Помогаю с контентом для соцсетей.\n\n\
        🔥 /trends - актуальные темы\n\
        ✍️ /rewrite &lt;текст&gt; - улучшение текстов\n\
        🔎 /competitor &lt;ник&gt; - разбор конкурента\n\
        🔔 /notify - ежедневные советы",
    button_trends: "🔥 Сканер трендов",
    button_copywriter: "✍️ Копирайтер",
    button_competitors: "🔎 Анализ конкурентов",
    button_notifications: "🔔 Уведомления",
    trends_working: "🔍 <b>Сканирую тренды...</b>\n⏳ Собираю данные и анализирую...",
    trends_header: "🔥 <b>АНАЛИЗ ТРЕНДОВ ДЛЯ 3D-ХУДОЖНИКА</b>",
    trends_next_steps: "💡 <b>Что дальше?</b>\n\n\
        • Используйте идеи для контента\n\
        • Улучшите текст через /rewrite\n\
        • Изучите конкурентов через /competitor",
    rewrite_usage: "✍️ <b>КОПИРАЙТЕР</b>\n\n\
        Отправьте команду вместе с текстом:\n\
        <code>/rewrite ваш текст</code>\n\n\
        Верну исправленную, короткую, развернутую и эмоциональную версии, \
        а также варианты для Twitter, Threads и LinkedIn.",
    rewrite_working: "✍️ <b>Обрабатываю текст...</b>\n⏳ Готовлю варианты...",
    rewrite_header: "✍️ <b>ВАРИАНТЫ ТЕКСТА</b>",
    text_too_short: "❌ Текст слишком короткий. Минимум 10 символов.",
    text_too_long: "❌ Текст слишком длинный. Максимум 2000 символов.",
    competitor_usage: "🔎 <b>АНАЛИЗ КОНКУРЕНТОВ</b>\n\n\
        Отправьте команду с ником или ссылкой на профиль:\n\
        <code>/competitor @username</code>\n\
        <code>/competitor https://twitter.com/username</code>",
    competitor_working: "🔎 <b>Анализирую профиль...</b>\n⏳ Собираю данные...",
    competitor_header: "🔎 <b>АНАЛИЗ КОНКУРЕНТА</b>",
    invalid_username: "❌ Некорректный ник. Попробуйте еще раз.",
    subscribed: "🔔 <b>Уведомления включены!</b>\n\n\
        Каждый день в {time} вы будете получать идею дня, совет, \
        лучшее время для постинга и актуальные тренды.",
    unsubscribed: "🔕 <b>Уведомления отключены</b>\n\n\
        Вы больше не будете получать ежедневные советы.",
    subscription_failed: "❌ Не удалось изменить подписку. Попробуйте позже.",
    daily_header: "🌅 <b>ДОБРОЕ УТРО, 3D-ХУДОЖНИК!</b>",
    model_failed: "❌ Не удалось получить ответ. Попробуйте позже.",
    unknown_command: "Не понимаю команду. Нажмите /start, чтобы увидеть меню.",
    truncated: "... (текст обрезан из-за лимита Telegram)",
};

/// English messages
pub static MESSAGES_EN: Messages = Messages {
    welcome: "🎨 <b>3D SMM Assistant</b>\n\n\
        I help with social media content.\n\n\
        🔥 /trends - current topics\n\
        ✍️ /rewrite &lt;text&gt; - polish a text\n\
        🔎 /competitor &lt;handle&gt; - competitor breakdown\n\
        🔔 /notify - daily tips",
    button_trends: "🔥 Trend scanner",
    button_copywriter: "✍️ Copywriter",
    button_competitors: "🔎 Competitor analysis",
    button_notifications: "🔔 Notifications",
    trends_working: "🔍 <b>Scanning trends...</b>\n⏳ Collecting and analyzing data...",
    trends_header: "🔥 <b>TREND ANALYSIS FOR 3D ARTISTS</b>",
    trends_next_steps: "💡 <b>What next?</b>\n\n\
        • Use the ideas for your content\n\
        • Polish a text with /rewrite\n\
        • Study competitors with /competitor",
    rewrite_usage: "✍️ <b>COPYWRITER</b>\n\n\
        Send the command together with your text:\n\
        <code>/rewrite your text</code>\n\n\
        You will get corrected, short, extended and emotional versions, \
        plus variants for Twitter, Threads and LinkedIn.",
    rewrite_working: "✍️ <b>Processing text...</b>\n⏳ Preparing variants...",
    rewrite_header: "✍️ <b>TEXT VARIANTS</b>",
    text_too_short: "❌ The text is too short. At least 10 characters.",
    text_too_long: "❌ The text is too long. At most 2000 characters.",
    competitor_usage: "🔎 <b>COMPETITOR ANALYSIS</b>\n\n\
        Send the command with a handle or profile link:\n\
        <code>/competitor @username</code>\n\
        <code>/competitor https://twitter.com/username</code>",
    competitor_working: "🔎 <b>Analyzing profile...</b>\n⏳ Collecting data...",
    competitor_header: "🔎 <b>COMPETITOR ANALYSIS</b>",
    invalid_username: "❌ Invalid handle. Please try again.",
    subscribed: "🔔 <b>Notifications enabled!</b>\n\n\
        Every day at {time} you will receive an idea of the day, a tip, \
        the best time to post and current trends.",
    unsubscribed: "🔕 <b>Notifications disabled</b>\n\n\
        You will no longer receive daily tips.",
    subscription_failed: "❌ Could not change your subscription. Please try later.",
    daily_header: "🌅 <b>GOOD MORNING, 3D ARTIST!</b>",
    model_failed: "❌ Could not get a response. Please try later.",
    unknown_command: "I don't understand that. Press /start to see the menu.",
    truncated: "... (text truncated due to Telegram limit)",
};

/// Get bot messages by language.
///
/// # Arguments
/// * `lang` - Language code, "ru" for Russian, "en" for English.
///
/// # Returns
/// Reference to Messages struct.
pub fn get_messages(lang: &str) -> &'static Messages {
    match lang {
        "en" => &MESSAGES_EN,
        _ => &MESSAGES_RU,
    }
}
