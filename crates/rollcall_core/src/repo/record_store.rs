//! Record store over a student repository.
//!
//! # Responsibility
//! - Expose `list`/`find`/`replace` over the current snapshot.
//! - Run read-modify-write sequences under a single writer lock.
//!
//! # Invariants
//! - `replace` and `update` never interleave; no update is lost.
//! - When `update`'s closure fails or persisting fails, storage is unchanged.

use crate::model::student::Student;
use crate::repo::student_repo::{RepoError, RepoResult, StudentRepository};
use std::sync::{Mutex, MutexGuard};

/// Serialized access to a whole-collection student repository.
pub struct RecordStore<R: StudentRepository> {
    repo: R,
    write_lock: Mutex<()>,
}

impl<R: StudentRepository> RecordStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the current snapshot in stored order.
    pub fn list(&self) -> RepoResult<Vec<Student>> {
        self.repo.load_all()
    }

    /// Returns the first student matching `predicate`, or `None`.
    pub fn find<P>(&self, mut predicate: P) -> RepoResult<Option<Student>>
    where
        P: FnMut(&Student) -> bool,
    {
        Ok(self
            .repo
            .load_all()?
            .into_iter()
            .find(|student| predicate(student)))
    }

    /// Atomically replaces the whole collection.
    pub fn replace(&self, students: Vec<Student>) -> RepoResult<()> {
        let _guard = self.lock_writer()?;
        self.repo.save_all(&students)
    }

    /// Runs one serialized read-modify-write sequence.
    ///
    /// `apply` receives the freshly loaded snapshot and returns whether it
    /// changed anything. Unchanged snapshots are not written back. The
    /// returned collection is what storage holds once the call completes.
    pub fn update<E, F>(&self, apply: F) -> Result<Vec<Student>, E>
    where
        E: From<RepoError>,
        F: FnOnce(&mut Vec<Student>) -> Result<bool, E>,
    {
        let _guard = self.lock_writer()?;
        let mut students = self.repo.load_all()?;
        if apply(&mut students)? {
            self.repo.save_all(&students)?;
        }
        Ok(students)
    }

    fn lock_writer(&self) -> RepoResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| RepoError::Unavailable("record store writer lock poisoned".to_string()))
    }
}
