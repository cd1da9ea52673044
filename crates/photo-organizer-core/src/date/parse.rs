use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::DateError;

/// Trailing timezone designator after a time of day: `Z`, `+01:00`, `-0500`, `+09`.
static TZ_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,2}:[0-9]{2}(?::[0-9]{2}(?:[.,][0-9]+)?)?(?P<tz>\s*(?:Z|[+-][0-9]{2}(?::?[0-9]{2})?))$")
        .unwrap()
});

/// `Sept`, `Sept.` and dotted abbreviations like `Mar.`, which the month
/// formats below do not accept as written.
static MONTH_ABBR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?P<sept>sep)t\.?|(?P<abbr>jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec)\.)(?P<end>[\s,]|$)",
    )
    .unwrap()
});

static COLON_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}:[0-9]{2}:[0-9]{2}$").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d,%Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Parse a date string from metadata or free text.
///
/// Timezone designators are dropped, not converted: `2024:03:15 14:30:00+01:00`
/// yields 14:30:00. A colon-delimited date segment (`YYYY:MM:DD`, the metadata
/// convention) is rewritten to `YYYY-MM-DD` before the flexible parse.
pub fn parse_date(input: &str) -> Result<NaiveDateTime, DateError> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let months = normalize_month_abbreviations(&collapsed);
    let normalized = normalize_date_segment(strip_timezone(&months));

    match parse_flexible(&normalized) {
        Some(dt) => Ok(dt),
        None => {
            tracing::debug!("Error parsing date '{}'", input);
            Err(DateError::Unparseable {
                input: input.to_string(),
            })
        }
    }
}

fn strip_timezone(s: &str) -> &str {
    match TZ_SUFFIX_RE.captures(s).and_then(|caps| caps.name("tz")) {
        Some(tz) => &s[..tz.start()],
        None => s,
    }
}

fn normalize_month_abbreviations(s: &str) -> String {
    MONTH_ABBR_RE
        .replace_all(s, |caps: &regex::Captures| {
            let month = caps.name("sept").or_else(|| caps.name("abbr")).map_or("", |m| m.as_str());
            format!("{}{}", month, &caps["end"])
        })
        .into_owned()
}

fn normalize_date_segment(s: &str) -> String {
    let (first, rest) = match s.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (s, None),
    };
    if !COLON_DATE_RE.is_match(first) {
        return s.to_string();
    }
    let date = first.replace(':', "-");
    match rest {
        Some(rest) => format!("{} {}", date, rest),
        None => date,
    }
}

fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_metadata_convention() {
        assert_eq!(
            parse_date("2024:03:15 14:30:00").unwrap(),
            dt(2024, 3, 15, 14, 30, 0)
        );
        assert_eq!(parse_date("2024:03:15").unwrap(), dt(2024, 3, 15, 0, 0, 0));
    }

    #[test]
    fn discards_timezone_without_converting() {
        assert_eq!(
            parse_date("2024:03:15 14:30:00+01:00").unwrap(),
            dt(2024, 3, 15, 14, 30, 0)
        );
        assert_eq!(
            parse_date("2024:03:15 23:59:59-05:00").unwrap(),
            dt(2024, 3, 15, 23, 59, 59)
        );
        assert_eq!(
            parse_date("2024-03-15T08:00:00Z").unwrap(),
            dt(2024, 3, 15, 8, 0, 0)
        );
    }

    #[test]
    fn keeps_subseconds_parseable() {
        let parsed = parse_date("2024:03:15 14:30:00.250").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn parses_textual_month() {
        assert_eq!(parse_date("March 5, 2024").unwrap(), dt(2024, 3, 5, 0, 0, 0));
        assert_eq!(parse_date("Mar 5 2024").unwrap(), dt(2024, 3, 5, 0, 0, 0));
        assert_eq!(parse_date("5 March 2024").unwrap(), dt(2024, 3, 5, 0, 0, 0));
        assert_eq!(
            parse_date("  July  4,   2019 ").unwrap(),
            dt(2019, 7, 4, 0, 0, 0)
        );
    }

    #[test]
    fn accepts_sept_and_dotted_abbreviations() {
        assert_eq!(parse_date("Sept 5, 2024").unwrap(), dt(2024, 9, 5, 0, 0, 0));
        assert_eq!(parse_date("Sept. 5, 2024").unwrap(), dt(2024, 9, 5, 0, 0, 0));
        assert_eq!(parse_date("Mar. 5, 2024").unwrap(), dt(2024, 3, 5, 0, 0, 0));
        assert_eq!(parse_date("5 Dec. 2023").unwrap(), dt(2023, 12, 5, 0, 0, 0));
        // Full names are left alone.
        assert_eq!(
            parse_date("September 5, 2024").unwrap(),
            dt(2024, 9, 5, 0, 0, 0)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("").is_err());
        assert!(parse_date("0000:00:00 00:00:00").is_err());
        assert!(parse_date("2024:13:01 00:00:00").is_err());
        assert!(parse_date("holiday photos").is_err());
    }
}
