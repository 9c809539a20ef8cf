//! Blame record formatting
//!
//! Turns a single [`BlameRecord`] into the display text shown in the status
//! bar: author name plus a relative date for recent commits, or an absolute
//! `YYYY-MM-DD` date for older ones.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

use crate::git::blame::{BlameRecord, UNCOMMITTED_AUTHOR};

/// Display form of one blame record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub author_text: String,
    pub date_text: String,
    pub is_committed: bool,
}

impl Formatted {
    fn uncommitted() -> Self {
        Self {
            author_text: UNCOMMITTED_AUTHOR.to_string(),
            date_text: String::new(),
            is_committed: false,
        }
    }
}

/// Formats a record against the given reference instant.
///
/// The sentinel author, a blank author or revision, and an unparseable date
/// all degrade to the uncommitted form; malformed records must never take
/// the whole widget down.
pub fn format_record(record: &BlameRecord, now: DateTime<Utc>, humanize_days: i64) -> Formatted {
    if !record.is_committed() || record.rev.trim().is_empty() {
        return Formatted::uncommitted();
    }

    let Some(date) = parse_date(&record.date) else {
        return Formatted::uncommitted();
    };

    let age = now.signed_duration_since(date.with_timezone(&Utc));
    let date_text = if age.num_days() <= humanize_days {
        humanize(age.num_seconds())
    } else {
        date.format("%Y-%m-%d").to_string()
    };

    Formatted {
        author_text: record.author.clone(),
        date_text,
        is_committed: true,
    }
}

/// Renders the status bar markup for a formatted record.
///
/// Committed lines become an anchor (navigation is handled by the click
/// handler, so the href is inert); everything else is the plain literal.
/// Byte-identical input produces byte-identical output.
pub fn render_markup(formatted: &Formatted) -> String {
    if !formatted.is_committed {
        return UNCOMMITTED_AUTHOR.to_string();
    }
    format!(
        "<a href=\"#\"><span class=\"author\">{}</span> · <span class=\"date\">{}</span></a>",
        formatted.author_text, formatted.date_text
    )
}

/// Plain-text form of a formatted record, for hosts without markup.
pub fn render_text(formatted: &Formatted) -> String {
    if !formatted.is_committed {
        return UNCOMMITTED_AUTHOR.to_string();
    }
    format!("{} · {}", formatted.author_text, formatted.date_text)
}

/// Parses a blame date, with or without a UTC offset.
///
/// Offset-less dates are taken as local time, matching how command-line
/// blame prints them.
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(date);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.fixed_offset())
}

/// Relative phrasing for a commit age in seconds.
///
/// Breakpoints follow the conventional humanization intervals
/// (45s / 90s / 45m / 90m / 22h / 36h / 26d), with each unit rounded to the
/// nearest whole value before pluralizing, so the windows just past a
/// singular breakpoint read "2 minutes ago", never "1 minutes ago". Ages in
/// the future clamp to "a few seconds ago".
fn humanize(age_seconds: i64) -> String {
    let seconds = age_seconds.max(0);
    let minutes = (seconds + 30) / 60;
    let hours = (seconds + 1800) / 3600;
    let days = (seconds + 43_200) / 86_400;

    if seconds < 45 {
        "a few seconds ago".to_string()
    } else if seconds < 90 {
        "a minute ago".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes ago")
    } else if minutes < 90 {
        "an hour ago".to_string()
    } else if hours < 22 {
        format!("{hours} hours ago")
    } else if hours < 36 {
        "a day ago".to_string()
    } else if days < 26 {
        format!("{days} days ago")
    } else {
        "a month ago".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, date: &str) -> BlameRecord {
        BlameRecord {
            author: author.to_string(),
            date: date.to_string(),
            line: "1".to_string(),
            rev: "12345678".to_string(),
        }
    }

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
            .map(|d| d.with_timezone(&Utc))
            .expect("valid test date")
    }

    #[test]
    fn test_absolute_date_beyond_threshold() {
        let formatted = format_record(
            &record("Baldur Helgason", "2016-04-04 09:05:39 +0000"),
            at("2017-04-05 17:00:00 +0000"),
            30,
        );
        assert!(formatted.is_committed);
        assert_eq!(formatted.date_text, "2016-04-04");
    }

    #[test]
    fn test_relative_date_within_threshold() {
        let formatted = format_record(
            &record("Baldur Helgason", "2017-04-03 17:05:39 +0000"),
            at("2017-04-05 17:05:39 +0000"),
            30,
        );
        assert_eq!(formatted.date_text, "2 days ago");
    }

    #[test]
    fn test_humanize_breakpoints() {
        assert_eq!(humanize(10), "a few seconds ago");
        assert_eq!(humanize(60), "a minute ago");
        assert_eq!(humanize(120), "2 minutes ago");
        assert_eq!(humanize(3600), "an hour ago");
        assert_eq!(humanize(7200), "2 hours ago");
        assert_eq!(humanize(86_400), "a day ago");
        assert_eq!(humanize(3 * 86_400), "3 days ago");
        assert_eq!(humanize(27 * 86_400), "a month ago");
    }

    #[test]
    fn test_humanize_rounds_past_singular_breakpoints() {
        // Just past each singular window the unit rounds up to two; the
        // truncated forms "1 minutes ago" / "1 hours ago" / "1 days ago"
        // must never appear.
        assert_eq!(humanize(90), "2 minutes ago");
        assert_eq!(humanize(95), "2 minutes ago");
        assert_eq!(humanize(119), "2 minutes ago");
        assert_eq!(humanize(90 * 60), "2 hours ago");
        assert_eq!(humanize(100 * 60), "2 hours ago");
        assert_eq!(humanize(36 * 3600), "2 days ago");
        assert_eq!(humanize(40 * 3600), "2 days ago");
    }

    #[test]
    fn test_humanize_rounds_up_to_the_next_unit() {
        // 44.5 minutes rounds to the 45-minute breakpoint, 21.5 hours to
        // the 22-hour one.
        assert_eq!(humanize(44 * 60 + 30), "an hour ago");
        assert_eq!(humanize(21 * 3600 + 1800), "a day ago");
    }

    #[test]
    fn test_future_date_clamps_to_seconds() {
        let formatted = format_record(
            &record("Baldur Helgason", "2017-04-05 17:05:39 +0000"),
            at("2017-04-05 17:00:00 +0000"),
            30,
        );
        assert_eq!(formatted.date_text, "a few seconds ago");
    }

    #[test]
    fn test_sentinel_author_is_uncommitted() {
        let formatted = format_record(
            &record(UNCOMMITTED_AUTHOR, "2017-04-03 17:05:39 +0000"),
            at("2017-04-05 17:00:00 +0000"),
            30,
        );
        assert!(!formatted.is_committed);
        assert_eq!(render_markup(&formatted), "Not Committed Yet");
    }

    #[test]
    fn test_malformed_date_degrades() {
        let formatted = format_record(
            &record("Baldur Helgason", "not a date"),
            at("2017-04-05 17:00:00 +0000"),
            30,
        );
        assert!(!formatted.is_committed);
    }

    #[test]
    fn test_blank_author_degrades() {
        let formatted = format_record(
            &record("  ", "2017-04-03 17:05:39 +0000"),
            at("2017-04-05 17:00:00 +0000"),
            30,
        );
        assert!(!formatted.is_committed);
    }

    #[test]
    fn test_markup_is_exact_and_stable() {
        let formatted = format_record(
            &record("Baldur Helgason", "2016-04-04 09:05:39 +0000"),
            at("2017-04-05 17:00:00 +0000"),
            30,
        );
        let expected = "<a href=\"#\"><span class=\"author\">Baldur Helgason</span> \
                        · <span class=\"date\">2016-04-04</span></a>";
        assert_eq!(render_markup(&formatted), expected);
        assert_eq!(render_markup(&formatted), render_markup(&formatted));
    }
}
