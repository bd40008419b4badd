//! Text helpers for terminal rendering.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Format a timestamp as a 12-hour clock time, e.g. `3:07 PM`.
#[must_use]
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%-I:%M %p").to_string()
}

/// Wrap `text` into lines of at most `width` characters.
///
/// Explicit newlines are kept; words longer than `width` are split.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    lines
}

/// Right-align `line` in a column of `width` characters.
#[must_use]
pub fn align_right(line: &str, width: usize) -> String {
    let len = line.chars().count();
    format!("{}{line}", " ".repeat(width.saturating_sub(len)))
}

/// Center `line` in a column of `width` characters.
#[must_use]
pub fn center(line: &str, width: usize) -> String {
    let len = line.chars().count();
    format!("{}{line}", " ".repeat(width.saturating_sub(len) / 2))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    #[test]
    fn test_format_time_twelve_hour() {
        let afternoon = Utc.with_ymd_and_hms(2024, 5, 1, 15, 7, 0).unwrap();
        assert_eq!(format_time(&afternoon), "3:07 PM");

        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 30, 0).unwrap();
        assert_eq!(format_time(&midnight), "12:30 AM");
    }

    #[test]
    fn test_format_time_uses_offset() {
        let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
        let time = Utc
            .with_ymd_and_hms(2024, 5, 1, 3, 5, 0)
            .unwrap()
            .with_timezone(&jakarta);
        assert_eq!(format_time(&time), "10:05 AM");
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(align_right("ab", 5), "   ab");
        assert_eq!(align_right("toolong", 3), "toolong");
        assert_eq!(center("ab", 6), "  ab");
    }
}
