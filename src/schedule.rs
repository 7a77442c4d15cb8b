//! Dates, query windows and clock formatting.
//!
//! The provider caps the span of a single flight listing, so a calendar day
//! is queried as two half-day [`SearchWindow`]s. Times come back as local
//! timestamp strings and are shown on a 12-hour clock by [`twelve_hour`].

use crate::error::InputError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Shown in place of a time that could not be read.
pub const INVALID_TIME: &str = "Invalid time";

/// Format of the local timestamps in flight listing paths.
const PATH_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A closed interval of local time used for one flight listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SearchWindow {
    /// Splits `date` into `[00:00, 11:59]` and `[12:00, 23:59]`, earliest first.
    pub fn halves_of(date: NaiveDate) -> [SearchWindow; 2] {
        let at = |h, m| date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default());
        [
            SearchWindow {
                start: at(0, 0),
                end: at(11, 59),
            },
            SearchWindow {
                start: at(12, 0),
                end: at(23, 59),
            },
        ]
    }

    pub fn start_param(&self) -> String {
        self.start.format(PATH_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(PATH_FORMAT).to_string()
    }

    /// `00:00-11:59` style label for messages.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Parses a travel date typed as MM/DD/YYYY.
pub fn parse_travel_date(input: &str) -> Result<NaiveDate, InputError> {
    let input = input.trim();
    // %Y alone would also take "5/1/24" as year 24.
    let has_full_year = input.rsplit('/').next().map_or(false, |y| y.len() == 4);
    match NaiveDate::parse_from_str(input, "%m/%d/%Y") {
        Ok(date) if has_full_year => Ok(date),
        _ => Err(InputError::BadDate(input.to_string())),
    }
}

/// Reads the clock time out of a provider timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM` and the ISO `T` form, each with an optional
/// seconds part and UTC offset, a bare `HH:MM`, and an already formatted
/// `H:MM AM`. The local wall-clock time is kept as written; offsets are not
/// applied.
pub fn parse_local_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const OFFSET_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M:%S%:z",
    ];
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%I:%M %p"];

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.time());
    }
    // "2024-05-01 08:00Z" as sent in the utc field.
    let zulu = raw.strip_suffix('Z').unwrap_or(raw);

    OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(raw, f).ok().map(|dt| dt.time()))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(zulu, f).ok().map(|dt| dt.time()))
        })
        .or_else(|| TIME_FORMATS.iter().find_map(|f| NaiveTime::parse_from_str(raw, f).ok()))
}

/// Renders a time as `H:MM AM`/`H:MM PM`; midnight is `12:MM AM`, noon `12:MM PM`.
pub fn clock_12h(time: NaiveTime) -> String {
    let hour = time.hour();
    let (display_hour, marker) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{}:{:02} {}", display_hour, time.minute(), marker)
}

/// Formats a provider timestamp on a 12-hour clock, or [`INVALID_TIME`].
pub fn twelve_hour(raw: &str) -> String {
    parse_local_time(raw).map_or_else(|| INVALID_TIME.to_string(), clock_12h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn clock_boundaries() {
        assert_eq!(clock_12h(t(0, 0)), "12:00 AM");
        assert_eq!(clock_12h(t(0, 7)), "12:07 AM");
        assert_eq!(clock_12h(t(1, 5)), "1:05 AM");
        assert_eq!(clock_12h(t(11, 59)), "11:59 AM");
        assert_eq!(clock_12h(t(12, 0)), "12:00 PM");
        assert_eq!(clock_12h(t(13, 0)), "1:00 PM");
        assert_eq!(clock_12h(t(23, 0)), "11:00 PM");
    }

    #[test]
    fn every_minute_of_the_day_round_trips() {
        for h in 0..24 {
            for m in 0..60 {
                let shown = clock_12h(t(h, m));
                assert_eq!(parse_local_time(&shown), Some(t(h, m)), "{shown}");
                assert_eq!(twelve_hour(&shown), shown);
            }
        }
    }

    #[test]
    fn provider_timestamps() {
        assert_eq!(twelve_hour("2024-05-01 23:05+03:00"), "11:05 PM");
        assert_eq!(twelve_hour("2024-05-01 00:30-04:00"), "12:30 AM");
        assert_eq!(twelve_hour("2024-05-01T12:15:00+02:00"), "12:15 PM");
        assert_eq!(twelve_hour("2024-05-01T09:40"), "9:40 AM");
        assert_eq!(twelve_hour("2024-05-01 08:00Z"), "8:00 AM");
        assert_eq!(twelve_hour("2024-05-01T08:00:00Z"), "8:00 AM");
        assert_eq!(twelve_hour("17:45"), "5:45 PM");
    }

    #[test]
    fn malformed_times_are_marked_not_raised() {
        for raw in ["", "   ", "soon", "2024-05-01", "25:00", "2024-05-01 24:10+03:00", "12:5x"] {
            assert_eq!(twelve_hour(raw), INVALID_TIME, "{raw:?}");
        }
    }

    #[test]
    fn day_splits_into_two_ordered_halves() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let [morning, afternoon] = SearchWindow::halves_of(date);
        assert_eq!(morning.start_param(), "2024-05-01T00:00");
        assert_eq!(morning.end_param(), "2024-05-01T11:59");
        assert_eq!(afternoon.start_param(), "2024-05-01T12:00");
        assert_eq!(afternoon.end_param(), "2024-05-01T23:59");
        assert!(morning.end < afternoon.start);
        assert_eq!(afternoon.label(), "12:00-23:59");
    }

    #[test]
    fn travel_dates() {
        assert_eq!(
            parse_travel_date(" 05/01/2024 "),
            Ok(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        assert_eq!(
            parse_travel_date("2/29/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        for bad in ["2024-05-01", "13/01/2024", "02/30/2024", "05/01/24", "", "tomorrow"] {
            assert!(matches!(parse_travel_date(bad), Err(InputError::BadDate(_))), "{bad:?}");
        }
    }
}
