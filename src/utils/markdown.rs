//! Helpers for Telegram MarkdownV2 output.
//!
//! Every character with markup meaning in MarkdownV2 must be prefixed with a
//! backslash to be shown literally. Schedule cells routinely contain dots,
//! dashes and parentheses ("доц. Иванов И.И.", "08:30-10:05", "(лаб.)"), so
//! all cell text goes through [`escape_markdown`] before it is sent.

const RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
    '!',
];

/// Escapes MarkdownV2 reserved characters.
///
/// # Example
/// ```
/// use uni_schedule_bot::utils::markdown::escape_markdown;
///
/// let escaped = escape_markdown("Матем. (лек.) 08:30-10:05");
/// assert_eq!(escaped, "Матем\\. \\(лек\\.\\) 08:30\\-10:05");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `*text*` with the inner text escaped.
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_brackets_and_parentheses() {
        assert_eq!(escape_markdown("[ауд.](101)"), "\\[ауд\\.\\]\\(101\\)");
        assert_eq!(escape_markdown("{x}"), "\\{x\\}");
    }

    #[test]
    fn test_escape_schedule_text() {
        assert_eq!(escape_markdown("08:30-10:05"), "08:30\\-10:05");
        assert_eq!(escape_markdown("доц. Иванов И.И."), "доц\\. Иванов И\\.И\\.");
        assert_eq!(escape_markdown("ГР-1 + ГР-2 = поток!"), "ГР\\-1 \\+ ГР\\-2 \\= поток\\!");
        assert_eq!(escape_markdown("#1 | > ~"), "\\#1 \\| \\> \\~");
    }

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
        assert_eq!(escape_markdown("ауд.\\2"), "ауд\\.\\\\2");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("Пн 8 декабря"), "Пн 8 декабря");
        assert_eq!(escape_markdown("🧑‍🏫 Расписание для преподавателя:"), "🧑‍🏫 Расписание для преподавателя:");
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold("ГР-1"), "*ГР\\-1*");
    }
}
