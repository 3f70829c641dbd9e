//! Attendance domain model.
//!
//! # Responsibility
//! - Define canonical student records and per-date attendance status.
//! - Keep the tri-state day truth (`DayStatus`) separate from the binary
//!   stored status (`AttendanceStatus`).
//!
//! # Invariants
//! - Every student is identified by a stable `StudentId`.
//! - At most one status exists per student per calendar date.
//! - The attendance map only grows; no removal API exists.

pub mod attendance;
pub mod student;
