//! System directives and prompt templates for the assistant's tasks.

/// Marker replaced by caller-supplied text when a template is rendered.
pub const INPUT_MARKER: &str = "{input}";

/// The templated operations the assistant runs against the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    TrendAnalysis,
    CopyRewrite,
    CompetitorAnalysis,
    DailyContent,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::TrendAnalysis,
        TaskKind::CopyRewrite,
        TaskKind::CompetitorAnalysis,
        TaskKind::DailyContent,
    ];

    /// Sampling temperature for the task.
    pub fn temperature(self) -> f32 {
        match self {
            TaskKind::DailyContent => 0.8,
            _ => 0.7,
        }
    }

    /// Short stable name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::TrendAnalysis => "trend_analysis",
            TaskKind::CopyRewrite => "copy_rewrite",
            TaskKind::CompetitorAnalysis => "competitor_analysis",
            TaskKind::DailyContent => "daily_content",
        }
    }
}

/// A system directive paired with its user-content template.
#[derive(Debug, Clone, Copy)]
pub struct TaskPrompt {
    pub system: &'static str,
    pub template: &'static str,
}

impl TaskPrompt {
    /// Interpolate caller text into the template.
    ///
    /// Templates without an input marker are returned unchanged.
    pub fn render(&self, input: &str) -> String {
        self.template.replacen(INPUT_MARKER, input.trim(), 1)
    }
}

/// Get the prompt for a task by language.
///
/// # Arguments
/// * `kind` - Task to run.
/// * `lang` - Language code, "ru" for Russian, "en" for English.
pub fn get_task_prompt(kind: TaskKind, lang: &str) -> &'static TaskPrompt {
    let set = match lang {
        "en" => &PROMPTS_EN,
        _ => &PROMPTS_RU,
    };
    match kind {
        TaskKind::TrendAnalysis => &set[0],
        TaskKind::CopyRewrite => &set[1],
        TaskKind::CompetitorAnalysis => &set[2],
        TaskKind::DailyContent => &set[3],
    }
}

/// Russian prompts, in `TaskKind::ALL` order.
pub static PROMPTS_RU: [TaskPrompt; 4] = [
    TaskPrompt {
        system: "Ты эксперт по SMM и 3D-графике. Ты анализируешь тренды для 3D-художников.",
        template: r#"Проанализируй собранные тренды:

{input}

Ответ оформи так:

📊 ТОП-5 ТРЕНДОВ:
1. [тренд]
2. [тренд]
3. [тренд]
4. [тренд]
5. [тренд]

💡 КАК АДАПТИРОВАТЬ ДЛЯ 3D:
[конкретные идеи]

📝 ПРИМЕРЫ ПОСТОВ:
🐦 Twitter: [пост]
🧵 Threads: [пост]
💼 LinkedIn: [пост]"#,
    },
    TaskPrompt {
        system: "Ты профессиональный копирайтер, пишущий для 3D-художников.",
        template: r#"Перепиши текст:

{input}

Ответ оформи так:

✅ ИСПРАВЛЕННАЯ ВЕРСИЯ:
[текст]

📏 КОРОТКАЯ ВЕРСИЯ (до 280 символов):
[текст]

📖 РАЗВЕРНУТАЯ ВЕРСИЯ:
[текст]

❤️ ЭМОЦИОНАЛЬНАЯ ВЕРСИЯ:
[текст]

🐦 ДЛЯ TWITTER:
[текст]

🧵 ДЛЯ THREADS:
[текст]

💼 ДЛЯ LINKEDIN:
[текст]"#,
    },
    TaskPrompt {
        system: "Ты SMM-аналитик, изучающий аккаунты 3D-художников.",
        template: r#"Проанализируй конкурента по данным:

{input}

Ответ оформи так:

📊 СТАТИСТИКА:
[частота постов, форматы]

🔥 САМЫЕ УСПЕШНЫЕ ПОСТЫ:
[топ-3 с пояснением]

📈 ЧТО РАБОТАЕТ:
[паттерны]

💡 РЕКОМЕНДАЦИИ:
[конкретные советы]

🎯 НИШЕВЫЕ ТРЕНДЫ:
[темы]"#,
    },
    TaskPrompt {
        system: "Ты ментор для 3D-художников.",
        template: r#"Составь ежедневную мотивационную рассылку:

💡 ИДЕЯ ДНЯ:
[креативная идея для 3D-проекта]

🎨 СОВЕТ ДНЯ:
[практический совет]

⏰ ЛУЧШЕЕ ВРЕМЯ ДЛЯ ПОСТИНГА:
[рекомендация с объяснением]

🔥 ЧТО СЕЙЧАС В ТРЕНДЕ:
[актуальная тема в 3D и дизайне]

Пиши вдохновляюще!"#,
    },
];

/// English prompts, in `TaskKind::ALL` order.
pub static PROMPTS_EN: [TaskPrompt; 4] = [
    TaskPrompt {
        system: "You are an SMM and 3D graphics expert. You analyze trends for 3D artists.",
        template: r#"Analyze the collected trends:

{input}

Format the answer as:

📊 TOP 5 TRENDS:
1. [trend]
2. [trend]
3. [trend]
4. [trend]
5. [trend]

💡 HOW TO ADAPT FOR 3D:
[concrete ideas]

📝 POST EXAMPLES:
🐦 Twitter: [post]
🧵 Threads: [post]
💼 LinkedIn: [post]"#,
    },
    TaskPrompt {
        system: "You are a professional copywriter writing for 3D artists.",
        template: r#"Rewrite this text:

{input}

Format the answer as:

✅ CORRECTED VERSION:
[text]

📏 SHORT VERSION (up to 280 characters):
[text]

📖 EXTENDED VERSION:
[text]

❤️ EMOTIONAL VERSION:
[text]

🐦 FOR TWITTER:
[text]

🧵 FOR THREADS:
[text]

💼 FOR LINKEDIN:
[text]"#,
    },
    TaskPrompt {
        system: "You are an SMM analyst studying the accounts of 3D artists.",
        template: r#"Analyze this competitor:

{input}

Format the answer as:

📊 STATISTICS:
[posting frequency, formats]

🔥 MOST SUCCESSFUL POSTS:
[top 3 with explanation]

📈 WHAT WORKS:
[patterns]

💡 RECOMMENDATIONS:
[concrete advice]

🎯 NICHE TRENDS:
[topics]"#,
    },
    TaskPrompt {
        system: "You are a mentor for 3D artists.",
        template: r#"Write a daily motivational newsletter:

💡 IDEA OF THE DAY:
[a creative idea for a 3D project]

🎨 TIP OF THE DAY:
[practical advice]

⏰ BEST TIME TO POST:
[recommendation with reasoning]

🔥 TRENDING NOW:
[a current topic in 3D and design]

Be inspiring!"#,
    },
];
