//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record and its attendance map.
//! - Provide the single mutation primitive used by the attendance service.
//!
//! # Invariants
//! - `id` is stable and never reused for another student.
//! - `mark` rewrites or inserts exactly one date entry.
//! - `email` is a case-insensitive lookup key but is not unique.

use crate::model::attendance::{
    deserialize_attendance_map, AttendanceMap, AttendanceStatus, DayStatus,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a student record.
pub type StudentId = Uuid;

/// Canonical student record.
///
/// Serialized with camelCase field names so the JSON blob keeps the shape
/// external consumers already read (`rollNumber`, `attendance`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub roll_number: String,
    pub name: String,
    pub email: String,
    /// Opaque display asset reference (URL or data blob).
    pub image: String,
    #[serde(default, deserialize_with = "deserialize_attendance_map")]
    pub attendance: AttendanceMap,
}

/// Validation errors for student records and add-student requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyName,
    EmptyRollNumber,
    EmptyEmail,
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name must not be empty"),
            Self::EmptyRollNumber => write!(f, "student roll number must not be empty"),
            Self::EmptyEmail => write!(f, "student email must not be empty"),
        }
    }
}

impl Error for StudentValidationError {}

impl Student {
    /// Creates a record with a generated stable ID and an empty attendance map.
    pub fn new(
        roll_number: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), roll_number, name, email, image)
    }

    /// Creates a record with a caller-provided ID.
    ///
    /// Used by storage and import paths where identity already exists.
    pub fn with_id(
        id: StudentId,
        roll_number: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            roll_number: roll_number.into(),
            name: name.into(),
            email: email.into(),
            image: image.into(),
            attendance: AttendanceMap::new(),
        }
    }

    /// Returns the tri-state status for `date`.
    pub fn status_on(&self, date: NaiveDate) -> DayStatus {
        DayStatus::from(self.attendance.get(&date).copied())
    }

    /// Sets the status for `date`, overwriting any previous entry for that date.
    pub fn mark(&mut self, date: NaiveDate, status: AttendanceStatus) {
        self.attendance.insert(date, status);
    }

    /// Case-insensitive email comparison used by "view own record" lookups.
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// Validates required display attributes.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if self.roll_number.trim().is_empty() {
            return Err(StudentValidationError::EmptyRollNumber);
        }
        if self.email.trim().is_empty() {
            return Err(StudentValidationError::EmptyEmail);
        }
        Ok(())
    }
}

/// Add-student request.
///
/// `email` and `image` are derived by the service when omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl NewStudent {
    pub fn new(roll_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            roll_number: roll_number.into(),
            name: name.into(),
            email: None,
            image: None,
        }
    }

    /// Checks required fields before any store access.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if self.roll_number.trim().is_empty() {
            return Err(StudentValidationError::EmptyRollNumber);
        }
        Ok(())
    }
}
