//! Reminder text formatting for each Telegram parse mode.

use clap::ValueEnum;

use crate::enrich::EnrichedRecord;
use crate::utils::escape_html;

/// Characters Telegram MarkdownV2 requires escaping anywhere in text.
const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

/// How reminder text is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Plain,
    #[value(name = "markdown-v2")]
    MarkdownV2,
    Html,
}

impl MessageFormat {
    /// The `parse_mode` value for the Bot API, `None` for plain text.
    pub fn parse_mode(self) -> Option<&'static str> {
        match self {
            MessageFormat::Plain => None,
            MessageFormat::MarkdownV2 => Some("MarkdownV2"),
            MessageFormat::Html => Some("HTML"),
        }
    }

    /// Escapes free text for this mode.
    pub fn escape(self, text: &str) -> String {
        match self {
            MessageFormat::Plain => text.to_string(),
            MessageFormat::MarkdownV2 => escape_with(text, MARKDOWN_V2_SPECIAL),
            MessageFormat::Html => escape_html(text),
        }
    }

    /// A link labelled `label` pointing at `url`.
    ///
    /// Falls back to the bare label when `url` is empty.
    pub fn link(self, label: &str, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return self.escape(label);
        }
        match self {
            MessageFormat::Plain => format!("{label} ({url})"),
            // Inside the (...) part of a link only ')' and '\' are special.
            MessageFormat::MarkdownV2 => format!(
                "[{}]({})",
                self.escape(label),
                escape_with(url, &[')', '\\'])
            ),
            MessageFormat::Html => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(url),
                escape_html(label)
            ),
        }
    }
}

fn escape_with(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Builds the expiry reminder for `record`, escaped for `format`.
pub fn build_reminder(record: &EnrichedRecord, days: i64, format: MessageFormat) -> String {
    let e = |text: &str| format.escape(text);
    let store = if record.vps.store.trim().is_empty() {
        "renew"
    } else {
        record.vps.store.as_str()
    };
    [
        e("🚨 [VPS Expiry Reminder] 🚨"),
        e("===================="),
        format!(
            "{}{}{}{}",
            e("🌍 Location: "),
            e(&record.country_code),
            e(" | "),
            e(&record.city)
        ),
        format!("{}{}", e("💻 IP: "), e(&record.vps.ip)),
        format!("{}{}", e("⏳ Days left: "), days),
        format!("{}{}", e("📅 Expires: "), e(&record.vps.endday)),
        format!(
            "{}{}",
            e("⚠️ Renew: "),
            format.link(store, &record.vps.store_url)
        ),
    ]
    .join("\n")
}
