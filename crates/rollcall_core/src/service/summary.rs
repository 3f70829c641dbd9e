//! Attendance summaries derived from a collection snapshot.
//!
//! # Responsibility
//! - Compute the binary daily summary across all students.
//! - Compute per-student tri-state views (totals, month calendar).
//!
//! # Invariants
//! - `daily_summary` folds unmarked students into `absent`;
//!   `present + absent == total` always holds.
//! - Per-student views never fold unmarked into absent.
//! - Nothing here is cached or persisted.

use crate::model::attendance::{AttendanceStatus, AttendanceValidationError, DayStatus};
use crate::model::student::Student;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Daily present/absent counts across the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySummary {
    pub present: usize,
    /// Explicitly absent plus unmarked students.
    pub absent: usize,
    pub total: usize,
    /// `present / total * 100`; `0.0` for an empty collection.
    pub percentage: f64,
}

/// Explicitly recorded day counts for one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTotals {
    pub present_days: usize,
    pub absent_days: usize,
}

/// One day in a student's month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
}

pub fn daily_summary(students: &[Student], date: NaiveDate) -> DailySummary {
    let total = students.len();
    let present = students
        .iter()
        .filter(|student| student.status_on(date) == DayStatus::Present)
        .count();
    let percentage = if total == 0 {
        0.0
    } else {
        present as f64 * 100.0 / total as f64
    };

    DailySummary {
        present,
        absent: total - present,
        total,
        percentage,
    }
}

/// Counts explicit entries only; unmarked days are in neither bucket.
pub fn student_totals(student: &Student) -> StudentTotals {
    student
        .attendance
        .values()
        .fold(StudentTotals::default(), |mut totals, status| {
            match status {
                AttendanceStatus::Present => totals.present_days += 1,
                AttendanceStatus::Absent => totals.absent_days += 1,
            }
            totals
        })
}

/// Returns every day of `year-month` with its tri-state status.
pub fn month_view(
    student: &Student,
    year: i32,
    month: u32,
) -> Result<Vec<CalendarDay>, AttendanceValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(AttendanceValidationError::InvalidMonth { year, month })?;

    Ok(first
        .iter_days()
        .take_while(|day| day.month() == month)
        .map(|date| CalendarDay {
            date,
            status: student.status_on(date),
        })
        .collect())
}
