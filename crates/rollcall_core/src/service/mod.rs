//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record-store calls into attendance use-cases.
//! - Keep derivations (summary, streak) as pure functions over a snapshot.
//! - Keep UI callers decoupled from storage details.

pub mod attendance_service;
pub mod seed;
pub mod streak;
pub mod summary;
pub mod viewer;
