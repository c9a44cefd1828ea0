//! Calendar-day parsing and expiry status classification.
//!
//! Dates travel as `YYYY-MM-DD` strings. They are always built from their
//! year/month/day components into a [`NaiveDate`]; nothing here goes through
//! an instant or a timezone, so midnight boundaries cannot shift a day.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Wire/display format of calendar dates.
pub const YMD_FORMAT: &str = "%Y-%m-%d";

/// Parse a string that strictly matches `YYYY-MM-DD`.
///
/// Returns `None` for anything else, including well-formed strings that do not
/// name a real day (`2024-02-30`).
pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    let digits = |range: core::ops::Range<usize>| -> Option<u32> {
        let part = &b[range];
        if !part.iter().all(u8::is_ascii_digit) {
            return None;
        }
        part.iter()
            .try_fold(0u32, |acc, d| acc.checked_mul(10)?.checked_add(u32::from(d - b'0')))
    };

    let year = digits(0..4)?;
    let month = digits(5..7)?;
    let day = digits(8..10)?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Parse a date as served by the backend.
///
/// Some endpoints return a full timestamp (`2024-06-10T00:00:00`); only the
/// leading calendar day is meaningful.
pub fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    match s.get(..10) {
        Some(head) if s.len() == 10 || s[10..].starts_with(['T', ' ']) => parse_ymd(head),
        _ => None,
    }
}

/// Serialize a date back to `YYYY-MM-DD`.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format(YMD_FORMAT).to_string()
}

/// Today's calendar day in the device's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `earlier` to `later` (negative if `later` is before).
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Position of a date relative to today.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    /// Strictly after today.
    Future,
    /// Exactly today.
    DueToday,
    /// Strictly before today.
    Overdue,
    /// No (valid) date.
    Unknown,
}

/// Palette slot used to render a status dot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Success,
    Accent,
    Danger,
    Neutral,
}

impl StatusColor {
    pub fn hex(&self) -> &'static str {
        match self {
            StatusColor::Success => "#2ECC71",
            StatusColor::Accent => "#FF9900",
            StatusColor::Danger => "#E53935",
            StatusColor::Neutral => "#9E9E9E",
        }
    }
}

impl ExpiryStatus {
    pub fn color(&self) -> StatusColor {
        match self {
            ExpiryStatus::Future => StatusColor::Success,
            ExpiryStatus::DueToday => StatusColor::Accent,
            ExpiryStatus::Overdue => StatusColor::Danger,
            ExpiryStatus::Unknown => StatusColor::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Future => "future",
            ExpiryStatus::DueToday => "due-today",
            ExpiryStatus::Overdue => "overdue",
            ExpiryStatus::Unknown => "unknown",
        }
    }
}

impl core::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a date against `today` at calendar-day granularity.
pub fn classify(date: Option<NaiveDate>, today: NaiveDate) -> ExpiryStatus {
    match date {
        None => ExpiryStatus::Unknown,
        Some(d) if d > today => ExpiryStatus::Future,
        Some(d) if d == today => ExpiryStatus::DueToday,
        Some(_) => ExpiryStatus::Overdue,
    }
}

/// Classify raw input; missing or malformed input is [`ExpiryStatus::Unknown`].
pub fn classify_str(raw: Option<&str>, today: NaiveDate) -> ExpiryStatus {
    classify(raw.and_then(parse_wire_date), today)
}
