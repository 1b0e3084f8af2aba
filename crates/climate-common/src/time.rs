//! Temporal buckets for historical climate data.
//!
//! The pipeline's temporal unit is coarse: a calendar year or a year-month.
//! Buckets have a total order (year-major) and a string round-trip
//! (`"1987"`, `"1987-03"`) used in persisted metadata.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar bucket that timestamps one grid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    /// A whole calendar year.
    Year(i32),
    /// A calendar month within a year (month is 1-12).
    Month(i32, u32),
}

impl TimeBucket {
    /// Create a year bucket.
    pub fn year(year: i32) -> Self {
        Self::Year(year)
    }

    /// Create a month bucket; month must be 1-12.
    pub fn month(year: i32, month: u32) -> Result<Self, TimeBucketParseError> {
        if !(1..=12).contains(&month) {
            return Err(TimeBucketParseError::InvalidMonth(month));
        }
        Ok(Self::Month(year, month))
    }

    /// The calendar year of this bucket.
    pub fn year_number(&self) -> i32 {
        match *self {
            Self::Year(y) | Self::Month(y, _) => y,
        }
    }

    /// Sort key: year-major, with a whole-year bucket ordering before any
    /// month bucket of the same year.
    fn sort_key(&self) -> (i32, u32) {
        match *self {
            Self::Year(y) => (y, 0),
            Self::Month(y, m) => (y, m),
        }
    }

    /// The last calendar day covered by this bucket.
    ///
    /// Month buckets stamp the last day of the month, matching the source
    /// data convention for monthly station records.
    pub fn end_date(&self) -> Option<NaiveDate> {
        match *self {
            Self::Year(y) => NaiveDate::from_ymd_opt(y, 12, 31),
            Self::Month(y, m) => {
                let first = NaiveDate::from_ymd_opt(y, m, 1)?;
                first.checked_add_months(Months::new(1))?.pred_opt()
            }
        }
    }
}

impl PartialOrd for TimeBucket {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeBucket {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Year(y) => write!(f, "{y}"),
            Self::Month(y, m) => write!(f, "{y}-{m:02}"),
        }
    }
}

impl FromStr for TimeBucket {
    type Err = TimeBucketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimeBucketParseError::InvalidFormat(s.to_string());

        match s.split_once('-') {
            None => {
                let year = s.parse::<i32>().map_err(|_| invalid())?;
                Ok(Self::Year(year))
            }
            Some((year, month)) => {
                let year = year.parse::<i32>().map_err(|_| invalid())?;
                let month = month.parse::<u32>().map_err(|_| invalid())?;
                Self::month(year, month)
            }
        }
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors from parsing or constructing a time bucket.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeBucketParseError {
    #[error("invalid time bucket format: {0}")]
    InvalidFormat(String),

    #[error("month out of range 1-12: {0}")]
    InvalidMonth(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_year_major() {
        let a = TimeBucket::year(1986);
        let b = TimeBucket::month(1987, 1).unwrap();
        let c = TimeBucket::month(1987, 12).unwrap();
        let d = TimeBucket::year(1988);

        assert!(a < b);
        assert!(b < c);
        assert!(c < d);
    }

    #[test]
    fn test_string_round_trip() {
        for s in ["1987", "1987-03", "2005-12"] {
            let bucket: TimeBucket = s.parse().unwrap();
            assert_eq!(bucket.to_string(), s);
        }
    }

    #[test]
    fn test_rejects_bad_month() {
        assert!("1987-13".parse::<TimeBucket>().is_err());
        assert!("1987-00".parse::<TimeBucket>().is_err());
        assert!("abc".parse::<TimeBucket>().is_err());
    }

    #[test]
    fn test_end_date_is_last_day_of_month() {
        let feb_leap = TimeBucket::month(2000, 2).unwrap();
        assert_eq!(
            feb_leap.end_date(),
            NaiveDate::from_ymd_opt(2000, 2, 29)
        );

        let year = TimeBucket::year(1999);
        assert_eq!(year.end_date(), NaiveDate::from_ymd_opt(1999, 12, 31));
    }
}
