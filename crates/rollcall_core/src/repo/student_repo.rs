//! Student persistence contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide the `load_all`/`save_all` seam every backend implements.
//! - Own the repository error taxonomy shared by all backends.
//!
//! # Invariants
//! - `save_all` replaces the whole collection or fails without side effects.
//! - Write paths reject invalid records before touching storage.

use crate::db::DbError;
use crate::model::student::{Student, StudentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    Io(std::io::Error),
    InvalidData(String),
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "student store io failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::Unavailable(message) => write!(f, "student store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Whole-collection persistence seam.
///
/// Any medium that can return and atomically replace the full student list
/// satisfies it; the core assumes no other transactional guarantees.
pub trait StudentRepository {
    fn load_all(&self) -> RepoResult<Vec<Student>>;
    fn save_all(&self, students: &[Student]) -> RepoResult<()>;
}

impl<R: StudentRepository + ?Sized> StudentRepository for &R {
    fn load_all(&self) -> RepoResult<Vec<Student>> {
        (**self).load_all()
    }

    fn save_all(&self, students: &[Student]) -> RepoResult<()> {
        (**self).save_all(students)
    }
}

/// Validates every record of a collection about to be persisted.
pub(crate) fn validate_all(students: &[Student]) -> RepoResult<()> {
    for student in students {
        student.validate()?;
    }
    Ok(())
}

/// Process-local repository, one isolated instance per caller.
#[derive(Debug, Default)]
pub struct MemoryStudentRepository {
    students: Mutex<Vec<Student>>,
}

impl MemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: Mutex::new(students),
        }
    }
}

impl StudentRepository for MemoryStudentRepository {
    fn load_all(&self) -> RepoResult<Vec<Student>> {
        let guard = self
            .students
            .lock()
            .map_err(|_| RepoError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save_all(&self, students: &[Student]) -> RepoResult<()> {
        validate_all(students)?;
        let mut guard = self
            .students
            .lock()
            .map_err(|_| RepoError::Unavailable("memory store lock poisoned".to_string()))?;
        *guard = students.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStudentRepository, RepoError, StudentRepository};
    use crate::model::student::Student;

    #[test]
    fn memory_repository_replaces_whole_collection() {
        let repo = MemoryStudentRepository::new();
        assert!(repo.load_all().unwrap().is_empty());

        let first = Student::new("S001", "John Doe", "john@example.com", "a.png");
        let second = Student::new("S002", "Jane Smith", "jane@example.com", "b.png");
        repo.save_all(&[first.clone(), second]).unwrap();
        repo.save_all(std::slice::from_ref(&first)).unwrap();

        assert_eq!(repo.load_all().unwrap(), vec![first]);
    }

    #[test]
    fn memory_repository_rejects_invalid_records_without_writing() {
        let valid = Student::new("S001", "John Doe", "john@example.com", "a.png");
        let repo = MemoryStudentRepository::with_students(vec![valid.clone()]);

        let invalid = Student::new("", "Nobody", "nobody@example.com", "x.png");
        let err = repo.save_all(&[invalid]).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(repo.load_all().unwrap(), vec![valid]);
    }
}
