//! Single-blob JSON file repository.
//!
//! # Responsibility
//! - Persist the whole student collection as one JSON array on disk.
//!
//! # Invariants
//! - Writes go to a sibling temporary file that is renamed into place, so a
//!   reader never observes a partially written blob.
//! - A missing file is an empty collection; an unreadable blob is an error.

use crate::model::student::Student;
use crate::repo::student_repo::{validate_all, RepoError, RepoResult, StudentRepository};
use log::{error, info};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// JSON-file-backed student repository.
#[derive(Debug, Clone)]
pub struct JsonFileStudentRepository {
    path: PathBuf,
}

impl JsonFileStudentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "students.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StudentRepository for JsonFileStudentRepository {
    fn load_all(&self) -> RepoResult<Vec<Student>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let students: Vec<Student> = serde_json::from_str(&raw).map_err(|err| {
            error!(
                "event=store_load module=repo status=error backend=json error_code=invalid_blob line={} column={}",
                err.line(),
                err.column()
            );
            RepoError::InvalidData(format!(
                "student blob `{}` is not valid: {err}",
                self.path.display()
            ))
        })?;
        for student in &students {
            student.validate().map_err(|err| {
                RepoError::InvalidData(format!("student {} in blob: {err}", student.id))
            })?;
        }
        Ok(students)
    }

    fn save_all(&self, students: &[Student]) -> RepoResult<()> {
        validate_all(students)?;
        let payload = serde_json::to_vec_pretty(students)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode students: {err}")))?;

        let staging = self.staging_path();
        let written = File::create(&staging).and_then(|mut file| {
            file.write_all(&payload)?;
            file.sync_all()
        });
        if let Err(err) = written.and_then(|()| fs::rename(&staging, &self.path)) {
            let _ = fs::remove_file(&staging);
            error!(
                "event=store_save module=repo status=error backend=json error_code=write_failed error={err}"
            );
            return Err(err.into());
        }

        info!(
            "event=store_save module=repo status=ok backend=json students={}",
            students.len()
        );
        Ok(())
    }
}
