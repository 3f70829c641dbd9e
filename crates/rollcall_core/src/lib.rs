//! Core domain logic for rollcall attendance tracking.
//! This crate is the single source of truth for attendance invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{
    format_date_key, parse_date_key, AttendanceMap, AttendanceStatus, AttendanceValidationError,
    DayStatus,
};
pub use model::student::{NewStudent, Student, StudentId, StudentValidationError};
pub use repo::json_repo::JsonFileStudentRepository;
pub use repo::record_store::RecordStore;
pub use repo::sqlite_repo::SqliteStudentRepository;
pub use repo::student_repo::{MemoryStudentRepository, RepoError, RepoResult, StudentRepository};
pub use service::attendance_service::{
    derive_email, AttendanceService, ServiceError, ServiceResult,
};
pub use service::seed::{random_roll, seed_students};
pub use service::streak::{current_streak, STREAK_WINDOW_DAYS};
pub use service::summary::{
    daily_summary, month_view, student_totals, CalendarDay, DailySummary, StudentTotals,
};
pub use service::viewer::{AdminView, Dashboard, Role, StudentView, Viewer};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
