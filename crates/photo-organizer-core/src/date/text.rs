use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::parse::parse_date;

struct TextPattern {
    name: &'static str,
    regex: &'static LazyLock<Regex>,
    extract: fn(&Captures, &str) -> Option<NaiveDateTime>,
}

static RE_YMD_SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})[_.-]([0-9]{2})[_.-]([0-9]{2})").unwrap());
static RE_YMD_HMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})([0-9]{2})([0-9]{2})[ _-]([0-9]{2})([0-9]{2})([0-9]{2})").unwrap()
});
static RE_YMD_CONTIGUOUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})([0-9]{2})([0-9]{2})").unwrap());
static RE_MONTH_DAY_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\.?\s+([0-9]{1,2}),?\s+([0-9]{4})").unwrap());

/// Tried strictly in order; the first pattern that matches and yields a real
/// calendar date wins.
static PATTERNS: &[TextPattern] = &[
    TextPattern {
        name: "YYYY-MM-DD",
        regex: &RE_YMD_SEPARATED,
        extract: date_only,
    },
    TextPattern {
        name: "YYYYMMDD_HHmmss",
        regex: &RE_YMD_HMS,
        extract: date_and_time,
    },
    TextPattern {
        name: "YYYYMMDD",
        regex: &RE_YMD_CONTIGUOUS,
        extract: date_only,
    },
    TextPattern {
        name: "Month DD, YYYY",
        regex: &RE_MONTH_DAY_YEAR,
        extract: reparse_whole,
    },
];

fn group(caps: &Captures, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

fn date_only(caps: &Captures, _text: &str) -> Option<NaiveDateTime> {
    let year = group(caps, 1)? as i32;
    NaiveDate::from_ymd_opt(year, group(caps, 2)?, group(caps, 3)?)?.and_hms_opt(0, 0, 0)
}

fn date_and_time(caps: &Captures, _text: &str) -> Option<NaiveDateTime> {
    let year = group(caps, 1)? as i32;
    NaiveDate::from_ymd_opt(year, group(caps, 2)?, group(caps, 3)?)?.and_hms_opt(
        group(caps, 4)?,
        group(caps, 5)?,
        group(caps, 6)?,
    )
}

/// The match only confirms a textual date is present; the whole input is parsed.
fn reparse_whole(_caps: &Captures, text: &str) -> Option<NaiveDateTime> {
    parse_date(text).ok()
}

/// Find a date in a filename or directory name.
pub fn extract_date_from_text(text: &str) -> Option<NaiveDateTime> {
    tracing::debug!("Trying to extract date from text: '{}'", text);

    for pat in PATTERNS {
        let Some(caps) = pat.regex.captures(text) else {
            continue;
        };
        match (pat.extract)(&caps, text) {
            Some(dt) => {
                tracing::debug!("Found date using '{}' pattern: {}", pat.name, dt);
                return Some(dt);
            }
            None => {
                tracing::debug!("Pattern '{}' matched '{}' but is not a valid date", pat.name, text);
            }
        }
    }

    tracing::debug!("No date found in text");
    None
}
