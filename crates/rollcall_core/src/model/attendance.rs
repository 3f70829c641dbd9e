//! Attendance status values and date keys.
//!
//! # Responsibility
//! - Define the two storable statuses and the derived tri-state day view.
//! - Provide canonical `YYYY-MM-DD` date key formatting/parsing.
//!
//! # Invariants
//! - Only `PRESENT` and `ABSENT` are valid stored values.
//! - A date with no entry is `DayStatus::Unmarked`, never `Absent`.

use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Canonical date key format used by every persisted attendance entry.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Sparse per-date status map. Missing keys mean "not marked".
pub type AttendanceMap = BTreeMap<NaiveDate, AttendanceStatus>;

/// Status explicitly recorded for one student on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Returns the stable wire/database form (`PRESENT` or `ABSENT`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "PRESENT",
            Self::Absent => "ABSENT",
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PRESENT" => Ok(Self::Present),
            "ABSENT" => Ok(Self::Absent),
            other => Err(AttendanceValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// Tri-state truth for one calendar day.
///
/// Consumers that render per-day state (calendars, totals) must use this
/// instead of collapsing `Unmarked` into `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Present,
    Absent,
    Unmarked,
}

impl DayStatus {
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

impl From<Option<AttendanceStatus>> for DayStatus {
    fn from(value: Option<AttendanceStatus>) -> Self {
        match value {
            Some(AttendanceStatus::Present) => Self::Present,
            Some(AttendanceStatus::Absent) => Self::Absent,
            None => Self::Unmarked,
        }
    }
}

/// Validation error for status values and date keys coming from callers or storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceValidationError {
    InvalidStatus(String),
    InvalidDateKey(String),
    InvalidMonth { year: i32, month: u32 },
}

impl Display for AttendanceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(value) => {
                write!(f, "invalid attendance status `{value}`; expected PRESENT|ABSENT")
            }
            Self::InvalidDateKey(value) => {
                write!(f, "invalid date key `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidMonth { year, month } => {
                write!(f, "invalid calendar month {year}-{month:02}")
            }
        }
    }
}

impl Error for AttendanceValidationError {}

/// Formats a date as its canonical `YYYY-MM-DD` key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a canonical `YYYY-MM-DD` key.
///
/// Surrounding whitespace or any other layout is rejected.
pub fn parse_date_key(value: &str) -> Result<NaiveDate, AttendanceValidationError> {
    if value.len() != 10 {
        return Err(AttendanceValidationError::InvalidDateKey(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_KEY_FORMAT)
        .map_err(|_| AttendanceValidationError::InvalidDateKey(value.to_string()))
}

/// Deserializes an attendance map through `parse_date_key`.
///
/// Non-canonical keys and two keys naming the same day are rejected.
pub fn deserialize_attendance_map<'de, D>(deserializer: D) -> Result<AttendanceMap, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(AttendanceMapVisitor)
}

struct AttendanceMapVisitor;

impl<'de> Visitor<'de> for AttendanceMapVisitor {
    type Value = AttendanceMap;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of YYYY-MM-DD keys to PRESENT|ABSENT")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = AttendanceMap::new();
        while let Some((key, status)) = access.next_entry::<String, AttendanceStatus>()? {
            let date = parse_date_key(&key).map_err(de::Error::custom)?;
            if map.insert(date, status).is_some() {
                return Err(de::Error::custom(format!(
                    "duplicate attendance entry for {date}"
                )));
            }
        }
        Ok(map)
    }
}
