//! Time-frame handling for grid extraction.
//!
//! The atlas grids cover a fixed span of years; every batch
//! computation validates its requested frame against that window
//! once, before any grid file is touched.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeFrameError {
    #[error("invalid date '{0}': must be YYYY, YYYY-MM or YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("time frame start {start} is after end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("time frame [{start}, {end}] outside supported window [{window_start}, {window_end}]")]
    OutOfWindow {
        start: NaiveDate,
        end: NaiveDate,
        window_start: NaiveDate,
        window_end: NaiveDate,
    },
}

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeFrame {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimeFrameError> {
        if start > end {
            return Err(TimeFrameError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a frame from two date strings.
    ///
    /// Accepts `YYYY` (January 1st), `YYYY-MM` (first of month) and
    /// full `YYYY-MM-DD` dates. A bare year as the end bound expands
    /// to December 31st so that `2009..2018` covers the whole of
    /// both years.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeFrameError> {
        let start = parse_date(start, false)?;
        let end = parse_date(end, true)?;
        Self::new(start, end)
    }

    /// Inclusive range of calendar years covered by the frame.
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    /// Check that this frame lies fully inside `window`.
    pub fn validate_within(&self, window: &TimeFrame) -> Result<(), TimeFrameError> {
        if self.start < window.start || self.end > window.end {
            return Err(TimeFrameError::OutOfWindow {
                start: self.start,
                end: self.end,
                window_start: window.start,
                window_end: window.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

fn parse_date(s: &str, end_of_period: bool) -> Result<NaiveDate, TimeFrameError> {
    let invalid = || TimeFrameError::InvalidFormat(s.to_string());

    match s.len() {
        // Year given
        4 => {
            let year: i32 = s.parse().map_err(|_| invalid())?;
            let (month, day) = if end_of_period { (12, 31) } else { (1, 1) };
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
        }
        // Year and month given
        7 => {
            let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
                .map_err(|_| invalid())?;
            if end_of_period {
                last_day_of_month(date).ok_or_else(invalid)
            } else {
                Ok(date)
            }
        }
        // Full date given
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = (first.year(), first.month());
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next_month.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_pair() {
        let frame = TimeFrame::parse("2009", "2018").unwrap();
        assert_eq!(frame.start, NaiveDate::from_ymd_opt(2009, 1, 1).unwrap());
        assert_eq!(frame.end, NaiveDate::from_ymd_opt(2018, 12, 31).unwrap());
        assert_eq!(frame.years(), 2009..=2018);
    }

    #[test]
    fn test_parse_month_and_date() {
        let frame = TimeFrame::parse("2010-02", "2012-11-23").unwrap();
        assert_eq!(frame.start, NaiveDate::from_ymd_opt(2010, 2, 1).unwrap());
        assert_eq!(frame.end, NaiveDate::from_ymd_opt(2012, 11, 23).unwrap());
    }

    #[test]
    fn test_parse_month_end_expands() {
        let frame = TimeFrame::parse("2012-01", "2012-02").unwrap();
        assert_eq!(frame.end, NaiveDate::from_ymd_opt(2012, 2, 29).unwrap());
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(matches!(
            TimeFrame::parse("20091", "2018"),
            Err(TimeFrameError::InvalidFormat(_))
        ));
        assert!(matches!(
            TimeFrame::parse("2009-13", "2018"),
            Err(TimeFrameError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_inverted_frame_rejected() {
        assert!(matches!(
            TimeFrame::parse("2018", "2009"),
            Err(TimeFrameError::Inverted { .. })
        ));
    }

    #[test]
    fn test_window_validation() {
        let window = TimeFrame::parse("2009", "2018").unwrap();
        let inside = TimeFrame::parse("2010", "2012").unwrap();
        assert!(inside.validate_within(&window).is_ok());

        let outside = TimeFrame::parse("2020", "2021").unwrap();
        assert!(matches!(
            outside.validate_within(&window),
            Err(TimeFrameError::OutOfWindow { .. })
        ));

        // Overlapping but not contained is rejected too.
        let straddle = TimeFrame::parse("2008", "2010").unwrap();
        assert!(straddle.validate_within(&window).is_err());
    }
}
