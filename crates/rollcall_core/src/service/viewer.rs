//! Caller identity and dashboard read models.
//!
//! The caller supplies `(user_id, role)` after its own credential check; the
//! core only compares roles and matches `user_id` against student emails.

use crate::model::attendance::DayStatus;
use crate::model::student::Student;
use crate::service::summary::{DailySummary, StudentTotals};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            other => Err(format!("unknown role `{other}`; expected ADMIN|USER")),
        }
    }
}

/// Already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Stable user identifier; an email for the `User` role.
    pub user_id: String,
    pub role: Role,
}

impl Viewer {
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// One student's record with its derived views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentView {
    pub student: Student,
    pub date: NaiveDate,
    pub status: DayStatus,
    pub streak: u32,
    pub totals: StudentTotals,
}

/// Whole-class view for administrators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminView {
    pub date: NaiveDate,
    pub students: Vec<Student>,
    pub summary: DailySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dashboard {
    Admin(AdminView),
    Student(StudentView),
}
