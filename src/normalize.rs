//! Canonicalization of the `MM-DD-YYYY` dates and `HH:MM:SS AM|PM` times
//! stored in the guest documents.
//!
//! Both functions return a tagged [`NormalizeError`] instead of panicking, and
//! log a diagnostic for every failure.  Callers that only care about "value or
//! no value" can use `.ok()` and carry on with the rest of the record.

use jiff::{
    civil::{Date, DateTime},
    tz::TimeZone,
    Timestamp,
};
use log::{error, warn};
use thiserror::Error;

pub mod parts;

use parts::{ClockTime, DateParts};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("missing {field}")]
    MissingInput { field: &'static str },
    #[error("invalid {component} component: {value:?}")]
    MalformedComponent {
        component: &'static str,
        value: String,
    },
    #[error("missing or unexpected AM/PM marker: {value:?}")]
    MalformedPeriodMarker { value: String },
    #[error("failed to parse {value:?}: {reason}")]
    UnparseableTimestamp { value: String, reason: String },
}

/// Combine a `MM-DD-YYYY` date and a 12-hour `HH:MM:SS AM|PM` time into an
/// instant.  The wall clock reading is interpreted in `tz`.
///
/// ```
/// use jiff::tz::TimeZone;
/// use signin_migrate::normalize::combine_date_time;
///
/// let ts = combine_date_time(Some("06-05-2024"), Some("09:15:45 PM"), &TimeZone::UTC).unwrap();
/// assert_eq!(ts.to_string(), "2024-06-05T21:15:45Z");
/// ```
pub fn combine_date_time(
    date: Option<&str>,
    time: Option<&str>,
    tz: &TimeZone,
) -> Result<Timestamp, NormalizeError> {
    let res = try_combine(date, time, tz);
    if let Err(e) = &res {
        match e {
            NormalizeError::UnparseableTimestamp { .. } => {
                error!("Error combining date {:?} and time {:?}: {}", date, time, e)
            }
            _ => warn!("Invalid date or time {:?}, {:?}: {}", date, time, e),
        }
    }
    res
}

fn try_combine(
    date: Option<&str>,
    time: Option<&str>,
    tz: &TimeZone,
) -> Result<Timestamp, NormalizeError> {
    let date = present("date", date)?;
    let time = present("time", time)?;

    let day = DateParts::parse(date)?.canonical();
    let clock = ClockTime::parse(time)?;

    let value = format!("{day}T{}", clock.canonical());
    // jiff reads a second of 60 as 59
    if clock.minute > 59 || clock.second > 59 {
        return Err(NormalizeError::UnparseableTimestamp {
            value,
            reason: "minute or second out of range".to_string(),
        });
    }
    let dt = value
        .parse::<DateTime>()
        .map_err(|e| unparseable(&value, e))?;
    let zoned = dt.to_zoned(tz.clone()).map_err(|e| unparseable(&value, e))?;
    Ok(zoned.timestamp())
}

/// Convert a `MM-DD-YYYY` date into a calendar date.
pub fn convert_date_to_iso(date: Option<&str>) -> Result<Date, NormalizeError> {
    let res = try_convert(date);
    if let Err(e) = &res {
        match e {
            NormalizeError::UnparseableTimestamp { .. } => {
                error!("Error converting date {:?} to ISO: {}", date, e)
            }
            _ => warn!("Invalid date {:?}: {}", date, e),
        }
    }
    res
}

fn try_convert(date: Option<&str>) -> Result<Date, NormalizeError> {
    let date = present("date", date)?;
    let value = DateParts::parse(date)?.canonical();
    value.parse::<Date>().map_err(|e| unparseable(&value, e))
}

fn present<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, NormalizeError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(NormalizeError::MissingInput { field }),
    }
}

fn unparseable(value: &str, e: jiff::Error) -> NormalizeError {
    NormalizeError::UnparseableTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use jiff::{
        civil::{date, Date},
        tz::{self, TimeZone},
        Timestamp,
    };

    use super::*;

    fn utc(date: &str, time: &str) -> Result<Timestamp, NormalizeError> {
        combine_date_time(Some(date), Some(time), &TimeZone::UTC)
    }

    #[test]
    fn combine_midnight_and_noon() -> Result<(), Box<dyn Error>> {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(
            utc("01-15-2024", "12:30:00 AM")?,
            "2024-01-15T00:30:00Z".parse::<Timestamp>()?
        );
        assert_eq!(
            utc("01-15-2024", "12:30:00 PM")?,
            "2024-01-15T12:30:00Z".parse::<Timestamp>()?
        );
        Ok(())
    }

    #[test]
    fn combine_evening() -> Result<(), Box<dyn Error>> {
        let ts = utc("06-05-2024", "09:15:45 PM")?;
        assert_eq!(ts.to_string(), "2024-06-05T21:15:45Z");
        // unpadded components
        let ts = utc("6-5-2024", "9:15:45 pm")?;
        assert_eq!(ts.to_string(), "2024-06-05T21:15:45Z");
        Ok(())
    }

    #[test]
    fn combine_morning_hours_unchanged() -> Result<(), Box<dyn Error>> {
        for hour in 1..=11 {
            let ts = utc("03-10-2024", &format!("{hour:02}:05:00 AM"))?;
            assert_eq!(ts.to_zoned(TimeZone::UTC).hour(), hour);
        }
        Ok(())
    }

    #[test]
    fn combine_in_fixed_offset() -> Result<(), Box<dyn Error>> {
        let eastern = TimeZone::fixed(tz::offset(-5));
        let ts = combine_date_time(Some("01-15-2024"), Some("09:00:00 AM"), &eastern)?;
        assert_eq!(ts.to_string(), "2024-01-15T14:00:00Z");
        Ok(())
    }

    #[test]
    fn combine_missing_input() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(
            combine_date_time(None, Some("09:15:45 PM"), &TimeZone::UTC),
            Err(NormalizeError::MissingInput { field: "date" })
        );
        assert_eq!(
            combine_date_time(Some("06-05-2024"), Some(""), &TimeZone::UTC),
            Err(NormalizeError::MissingInput { field: "time" })
        );
        assert_eq!(
            combine_date_time(Some("  "), None, &TimeZone::UTC),
            Err(NormalizeError::MissingInput { field: "date" })
        );
    }

    #[test]
    fn combine_malformed_components() {
        assert!(matches!(
            utc("06-05-2024", "nine:15:45 PM"),
            Err(NormalizeError::MalformedComponent { component: "hour", .. })
        ));
        assert!(matches!(
            utc("06-05-2024", "09:15:45"),
            Err(NormalizeError::MalformedPeriodMarker { .. })
        ));
        assert!(matches!(
            utc("06/05/2024", "09:15:45 PM"),
            Err(NormalizeError::MalformedComponent { component: "date", .. })
        ));
    }

    #[test]
    fn combine_rejects_invalid_calendar_date() {
        // no rollover into the next year
        assert!(matches!(
            utc("13-40-2024", "09:15:45 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        assert!(matches!(
            utc("02-30-2024", "09:15:45 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        assert!(matches!(
            utc("02-29-2023", "09:15:45 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
    }

    #[test]
    fn combine_rejects_out_of_range_clock() {
        assert!(matches!(
            utc("06-05-2024", "13:00:00 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        assert!(matches!(
            utc("06-05-2024", "10:75:00 AM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        assert!(matches!(
            utc("06-05-24", "10:15:00 AM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
    }

    #[test]
    fn combine_rejects_leap_second() {
        assert!(matches!(
            utc("06-05-2024", "11:59:60 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        assert!(matches!(
            utc("12-31-2016", "11:59:60 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        assert!(matches!(
            utc("06-05-2024", "11:60:00 PM"),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
    }

    #[test]
    fn convert_date() -> Result<(), Box<dyn Error>> {
        assert_eq!(convert_date_to_iso(Some("03-04-2025"))?, date(2025, 3, 4));
        assert_eq!(convert_date_to_iso(Some("3-4-2025"))?.to_string(), "2025-03-04");
        assert_eq!(
            convert_date_to_iso(Some("")),
            Err(NormalizeError::MissingInput { field: "date" })
        );
        assert_eq!(
            convert_date_to_iso(None),
            Err(NormalizeError::MissingInput { field: "date" })
        );
        assert!(matches!(
            convert_date_to_iso(Some("13-01-2025")),
            Err(NormalizeError::UnparseableTimestamp { .. })
        ));
        Ok(())
    }

    #[test]
    fn convert_date_round_trip() -> Result<(), Box<dyn Error>> {
        let iso = convert_date_to_iso(Some("03-04-2025"))?;
        assert_eq!(iso.to_string().parse::<Date>()?, iso);
        let again = convert_date_to_iso(Some(&iso.strftime("%m-%d-%Y").to_string()))?;
        assert_eq!(again.to_string(), iso.to_string());
        Ok(())
    }
}
