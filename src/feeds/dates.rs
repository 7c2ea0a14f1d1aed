use chrono::{DateTime, Utc};

use crate::feeds::result::{LayoutError, NormalizeError};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

enum Format {
    Offset(&'static str),
    /// RFC 2822 with a zone name such as `GMT` or `PST`.
    NamedZone,
}

struct Layout {
    weekday: bool,
    format: Format,
}

/// Tried in order, first match wins.
const LAYOUTS: [Layout; 4] = [
    // Mon, 02 Jan 2006 15:04:05 -0700
    Layout {
        weekday: true,
        format: Format::Offset("%d %b %Y %H:%M:%S %z"),
    },
    // Mon, 02 Jan 2006 15:04:05 MST
    Layout {
        weekday: true,
        format: Format::NamedZone,
    },
    // Mon, 2 Jan 2006 15:04:05 -0700
    Layout {
        weekday: true,
        format: Format::Offset("%-d %b %Y %H:%M:%S %z"),
    },
    // 2 Jan 2006 15:04:05 -0700
    Layout {
        weekday: false,
        format: Format::Offset("%-d %b %Y %H:%M:%S %z"),
    },
];

impl Layout {
    fn parse(&self, value: &str) -> Result<DateTime<Utc>, LayoutError> {
        let rest = if self.weekday {
            strip_weekday(value)?
        } else {
            value
        };
        let date = match self.format {
            Format::Offset(format) => DateTime::parse_from_str(rest, format)?,
            Format::NamedZone => parse_named_zone(rest)?,
        };
        Ok(date.with_timezone(&Utc))
    }
}

/// chrono knows the RFC 2822 zone names. Any other alphabetic zone is read
/// as UTC.
fn parse_named_zone(value: &str) -> Result<DateTime<chrono::FixedOffset>, chrono::ParseError> {
    match DateTime::parse_from_rfc2822(value) {
        Ok(date) => Ok(date),
        Err(error) => match value.rsplit_once(' ') {
            Some((stamp, zone)) if zone.chars().all(|c| c.is_ascii_alphabetic()) => {
                DateTime::parse_from_rfc2822(&format!("{} +0000", stamp))
            }
            _ => Err(error),
        },
    }
}

/// The weekday must look like one, but it is not checked against the date:
/// plenty of feeds get it wrong.
fn strip_weekday(value: &str) -> Result<&str, LayoutError> {
    match value.split_once(", ") {
        Some((day, rest)) if WEEKDAYS.iter().any(|w| w.eq_ignore_ascii_case(day)) => Ok(rest),
        Some((day, _)) => Err(LayoutError::Weekday(day.to_string())),
        None => Err(LayoutError::Weekday(value.to_string())),
    }
}

/// Parse a feed publication date into UTC.
///
/// # Errors
///
/// Will return Err carrying the input and the last layout's failure when no
/// layout matches.
pub fn normalize(raw: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let value = raw.trim();
    let mut last = LayoutError::Empty;
    if !value.is_empty() {
        for layout in &LAYOUTS {
            match layout.parse(value) {
                Ok(date) => return Ok(date),
                Err(error) => last = error,
            }
        }
    }
    Err(NormalizeError {
        raw: raw.to_string(),
        last,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn it_parses_rfc1123_with_numeric_offset() {
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 +0000").unwrap(), utc(2, 10));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 -0700").unwrap(), utc(2, 17));
    }

    #[test]
    fn it_parses_rfc1123_with_named_zone() {
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 GMT").unwrap(), utc(2, 10));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 MST").unwrap(), utc(2, 17));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 EDT").unwrap(), utc(2, 14));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 CEST").unwrap(), utc(2, 10));
    }

    #[test]
    fn it_reads_unlisted_zone_names_as_utc() {
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 UTC").unwrap(), utc(2, 10));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 UT").unwrap(), utc(2, 10));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 Z").unwrap(), utc(2, 10));
        assert_eq!(normalize("Mon, 02 Jan 2023 10:00:00 PST").unwrap(), utc(2, 18));
    }

    #[test]
    fn it_ignores_a_wrong_weekday_before_a_zone_name() {
        assert_eq!(normalize("Fri, 02 Jan 2023 10:00:00 GMT").unwrap(), utc(2, 10));
    }

    #[test]
    fn it_reports_chrono_errors_for_bad_zone_names() {
        let error = normalize("Mon, 02 Jan 2023 10:00:00 +07:00:00").unwrap_err();
        assert!(matches!(error.last, LayoutError::Chrono(_)));
    }

    #[test]
    fn it_parses_single_digit_days() {
        assert_eq!(normalize("Tue, 3 Jan 2023 10:00:00 +0000").unwrap(), utc(3, 10));
    }

    #[test]
    fn it_parses_dates_without_weekday() {
        assert_eq!(normalize("4 Jan 2023 10:00:00 +0000").unwrap(), utc(4, 10));
        assert_eq!(normalize("  4 Jan 2023 10:00:00 +0100 ").unwrap(), utc(4, 9));
    }

    #[test]
    fn it_ignores_a_wrong_weekday() {
        assert_eq!(normalize("Fri, 02 Jan 2023 10:00:00 +0000").unwrap(), utc(2, 10));
    }

    #[test]
    fn it_reports_the_raw_value_when_nothing_matches() {
        let error = normalize("not-a-date").unwrap_err();
        assert_eq!(error.raw, "not-a-date");
        assert!(matches!(error.last, LayoutError::Chrono(_)));
    }

    #[test]
    fn it_rejects_empty_dates() {
        let error = normalize("   ").unwrap_err();
        assert_eq!(error.last, LayoutError::Empty);
    }

    #[test]
    fn it_rejects_unknown_weekday_names() {
        assert!(normalize("Xyz, 02 Jan 2023 10:00:00 +0000").is_err());
    }
}
