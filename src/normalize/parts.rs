//! Splitting of the loosely formatted date and time strings found in the
//! guest documents.  Only separator counts and numeric checks happen here,
//! calendar and clock validation is left to the jiff parser.

use super::NormalizeError;

/// The three components of a `MM-DD-YYYY` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts<'a> {
    pub month: u8,
    pub day: u8,
    /// Kept as written.  A year that is not four digits fails later, when
    /// the canonical string is parsed.
    pub year: &'a str,
}

impl<'a> DateParts<'a> {
    pub fn parse(s: &'a str) -> Result<DateParts<'a>, NormalizeError> {
        let parts: Vec<&str> = s.split('-').map(|e| e.trim()).collect();
        let [month, day, year] = parts[..] else {
            return Err(NormalizeError::MalformedComponent {
                component: "date",
                value: s.to_string(),
            });
        };
        let month = parse_number("month", month)?;
        let day = parse_number("day", day)?;
        if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NormalizeError::MalformedComponent {
                component: "year",
                value: year.to_string(),
            });
        }
        Ok(DateParts { month, day, year })
    }

    /// Canonical `YYYY-MM-DD` string, month and day zero-padded.
    pub fn canonical(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// A 12-hour clock reading, `HH:MM:SS AM|PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub meridiem: Meridiem,
}

impl ClockTime {
    pub fn parse(s: &str) -> Result<ClockTime, NormalizeError> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [hour, minute, rest] = parts[..] else {
            return Err(NormalizeError::MalformedComponent {
                component: "time",
                value: s.to_string(),
            });
        };
        let hour = parse_number("hour", hour)?;
        let minute = parse_number("minute", minute)?;
        let Some((second, period)) = rest.trim().split_once(' ') else {
            parse_number("second", rest)?;
            return Err(NormalizeError::MalformedPeriodMarker {
                value: String::new(),
            });
        };
        let second = parse_number("second", second)?;

        let period = period.trim();
        let meridiem = if period.eq_ignore_ascii_case("AM") {
            Meridiem::Am
        } else if period.eq_ignore_ascii_case("PM") {
            Meridiem::Pm
        } else {
            return Err(NormalizeError::MalformedPeriodMarker {
                value: period.to_string(),
            });
        };

        Ok(ClockTime {
            hour,
            minute,
            second,
            meridiem,
        })
    }

    /// Hour of day on a 24-hour clock.  An hour of 0 is taken as already
    /// being on a 24-hour clock and is left alone.
    pub fn hour24(&self) -> u8 {
        match (self.meridiem, self.hour) {
            (Meridiem::Pm, h) if h != 12 => h.saturating_add(12),
            (Meridiem::Am, 12) => 0,
            (_, h) => h,
        }
    }

    /// `HH:MM:SS` on a 24-hour clock.
    pub fn canonical(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour24(), self.minute, self.second)
    }
}

/// Digits only, no sign.
fn parse_number(component: &'static str, value: &str) -> Result<u8, NormalizeError> {
    let malformed = || NormalizeError::MalformedComponent {
        component,
        value: value.to_string(),
    };
    let digits = value.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    digits.parse::<u8>().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn parse_date_parts() -> Result<(), Box<dyn Error>> {
        let parts = DateParts::parse("3-4-2025")?;
        assert_eq!(parts.month, 3);
        assert_eq!(parts.day, 4);
        assert_eq!(parts.year, "2025");
        assert_eq!(parts.canonical(), "2025-03-04");

        assert_eq!(DateParts::parse("12-31-1999")?.canonical(), "1999-12-31");
        assert_eq!(DateParts::parse(" 01 - 02 - 2024 ")?.canonical(), "2024-01-02");
        Ok(())
    }

    #[test]
    fn parse_date_parts_rejects_bad_shapes() {
        assert!(matches!(
            DateParts::parse("2024/01/15"),
            Err(NormalizeError::MalformedComponent { component: "date", .. })
        ));
        assert!(matches!(
            DateParts::parse("01-15"),
            Err(NormalizeError::MalformedComponent { component: "date", .. })
        ));
        assert!(matches!(
            DateParts::parse("01-15-2024-01"),
            Err(NormalizeError::MalformedComponent { component: "date", .. })
        ));
        assert!(matches!(
            DateParts::parse("Jan-15-2024"),
            Err(NormalizeError::MalformedComponent { component: "month", .. })
        ));
        assert!(matches!(
            DateParts::parse("01-xx-2024"),
            Err(NormalizeError::MalformedComponent { component: "day", .. })
        ));
        assert!(matches!(
            DateParts::parse("01-15-20x4"),
            Err(NormalizeError::MalformedComponent { component: "year", .. })
        ));
        assert!(matches!(
            DateParts::parse("+3-4-2025"),
            Err(NormalizeError::MalformedComponent { component: "month", .. })
        ));
        assert!(matches!(
            DateParts::parse("3-+4-2025"),
            Err(NormalizeError::MalformedComponent { component: "day", .. })
        ));
    }

    #[test]
    fn parse_clock_time_rejects_signs() {
        assert!(matches!(
            ClockTime::parse("+9:+5:+5 PM"),
            Err(NormalizeError::MalformedComponent { component: "hour", .. })
        ));
        assert!(matches!(
            ClockTime::parse("9:+5:05 PM"),
            Err(NormalizeError::MalformedComponent { component: "minute", .. })
        ));
        assert!(matches!(
            ClockTime::parse("9:05:+5 PM"),
            Err(NormalizeError::MalformedComponent { component: "second", .. })
        ));
    }

    #[test]
    fn parse_clock_time() -> Result<(), Box<dyn Error>> {
        let t = ClockTime::parse("09:15:45 PM")?;
        assert_eq!((t.hour, t.minute, t.second), (9, 15, 45));
        assert_eq!(t.meridiem, Meridiem::Pm);
        assert_eq!(t.canonical(), "21:15:45");

        assert_eq!(ClockTime::parse("9:05:00 am")?.canonical(), "09:05:00");
        assert_eq!(ClockTime::parse("12:00:00 Pm")?.canonical(), "12:00:00");
        assert_eq!(ClockTime::parse("12:00:00 AM")?.canonical(), "00:00:00");
        assert_eq!(ClockTime::parse("0:10:00 AM")?.canonical(), "00:10:00");
        assert_eq!(ClockTime::parse("0:10:00 PM")?.canonical(), "12:10:00");
        Ok(())
    }

    #[test]
    fn hour24_keeps_morning_hours() -> Result<(), Box<dyn Error>> {
        for hour in 1..=11 {
            let t = ClockTime::parse(&format!("{hour}:00:00 AM"))?;
            assert_eq!(t.hour24(), hour);
        }
        Ok(())
    }

    #[test]
    fn parse_clock_time_rejects_bad_shapes() {
        assert!(matches!(
            ClockTime::parse("09:15 PM"),
            Err(NormalizeError::MalformedComponent { component: "time", .. })
        ));
        assert!(matches!(
            ClockTime::parse("aa:15:45 PM"),
            Err(NormalizeError::MalformedComponent { component: "hour", .. })
        ));
        assert!(matches!(
            ClockTime::parse("09:1x:45 PM"),
            Err(NormalizeError::MalformedComponent { component: "minute", .. })
        ));
        assert!(matches!(
            ClockTime::parse("09:15:4x PM"),
            Err(NormalizeError::MalformedComponent { component: "second", .. })
        ));
        assert_eq!(
            ClockTime::parse("09:15:45"),
            Err(NormalizeError::MalformedPeriodMarker {
                value: String::new()
            })
        );
        assert_eq!(
            ClockTime::parse("09:15:45 XM"),
            Err(NormalizeError::MalformedPeriodMarker {
                value: "XM".to_string()
            })
        );
    }
}
