//! Reply formatting for Telegram HTML messages.

/// Character budget for a single outgoing message.
pub const MESSAGE_LIMIT: usize = 4000;

fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match escape_char(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Escape `text` so that the result fits in `budget` characters.
///
/// Entities are never split; when the text does not fit it is cut and the
/// escaped `marker` is appended.
pub fn escape_within(text: &str, budget: usize, marker: &str) -> String {
    let escaped = escape_html(text);
    if escaped.chars().count() <= budget {
        return escaped;
    }

    let marker = escape_html(marker);
    let keep = budget.saturating_sub(marker.chars().count() + 1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let width = escape_char(c).map_or(1, str::len);
        if used + width > keep {
            break;
        }
        match escape_char(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
        used += width;
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out.push_str(&marker);
    out
}

/// Compose a reply from an HTML header, untrusted model text and an
/// optional HTML footer, staying within [`MESSAGE_LIMIT`].
pub fn render_reply(header: &str, body: &str, footer: Option<&str>, marker: &str) -> String {
    let footer = footer.map(|f| format!("\n\n{}", f)).unwrap_or_default();
    let fixed = header.chars().count() + 2 + footer.chars().count();
    let budget = MESSAGE_LIMIT.saturating_sub(fixed);
    format!("{}\n\n{}{}", header, escape_within(body.trim(), budget, marker), footer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("привет 🎨"), "привет 🎨");
    }

    #[test]
    fn test_escape_within_never_splits_entities() {
        let text = "&".repeat(10);
        let out = escape_within(&text, 22, "~");
        // 5 chars per entity, 20 budget after the marker line
        assert_eq!(out, format!("{}\n~", "&amp;".repeat(4)));
        assert!(out.chars().count() <= 22);
    }

    #[test]
    fn test_render_reply_fits_message_limit() {
        let body = "<tag> ".repeat(2000);
        let reply = render_reply("<b>HEADER</b>", &body, Some("<i>footer</i>"), "... (cut)");
        assert!(reply.chars().count() <= MESSAGE_LIMIT);
        assert!(reply.starts_with("<b>HEADER</b>\n\n&lt;tag&gt;"));
        assert!(reply.ends_with("... (cut)\n\n<i>footer</i>"));
        assert!(!reply.contains("<tag>"));
    }

    #[test]
    fn test_render_reply_without_footer() {
        let reply = render_reply("<b>H</b>", "  body  ", None, "...");
        assert_eq!(reply, "<b>H</b>\n\nbody");
    }
}
