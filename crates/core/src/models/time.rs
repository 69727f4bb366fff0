use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A time value as reported by the rendering surface.
///
/// At fine zoom levels the surface hands back the Unix-seconds timestamp we
/// gave it; at coarser levels it may report a calendar day instead. Both
/// must resolve to the same key before any lookup against the point model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartTime {
    /// Unix seconds
    Timestamp(i64),

    /// Calendar day; `month` is 1-based (January = 1)
    BusinessDay { year: i32, month: u32, day: u32 },

    /// `YYYY-MM-DD`
    DateString(String),
}

impl ChartTime {
    /// Normalize to Unix seconds at UTC midnight (timestamps pass through).
    /// Returns `None` for dates that do not exist on the calendar.
    pub fn to_unix(&self) -> Option<i64> {
        match self {
            ChartTime::Timestamp(ts) => Some(*ts),
            ChartTime::BusinessDay { year, month, day } => {
                // Month arrives 1-based; chrono's month0 setter wants it 0-based.
                let month0 = month.checked_sub(1)?;
                let date = NaiveDate::from_ymd_opt(*year, 1, 1)?
                    .with_month0(month0)?
                    .with_day(*day)?;
                Some(day_start_unix(date))
            }
            ChartTime::DateString(s) => parse_day(s).map(day_start_unix),
        }
    }
}

impl From<i64> for ChartTime {
    fn from(ts: i64) -> Self {
        ChartTime::Timestamp(ts)
    }
}

impl From<NaiveDate> for ChartTime {
    fn from(date: NaiveDate) -> Self {
        ChartTime::BusinessDay {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Parse a strict `YYYY-MM-DD` day string.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Unix seconds of UTC midnight on `date`.
pub fn day_start_unix(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Calendar day (UTC) containing the Unix-seconds timestamp `ts`.
pub fn unix_to_day(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}
