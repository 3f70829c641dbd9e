//! Record store and persistence backends.
//!
//! # Responsibility
//! - Define the whole-collection persistence seam (`StudentRepository`).
//! - Serialize read-modify-write sequences through `RecordStore`.
//! - Provide in-memory, JSON file and SQLite implementations of the seam.
//!
//! # Invariants
//! - Repository writes must call `Student::validate()` for every record.
//! - A reader observes either the full previous or the full next snapshot.
//! - "Not found" is an `Option::None`, never an error variant.

pub mod json_repo;
pub mod record_store;
pub mod sqlite_repo;
pub mod student_repo;
