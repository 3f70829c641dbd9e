//! SQLite student repository.
//!
//! # Responsibility
//! - Map the student collection onto `students` + `attendance` tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_all` replaces both tables inside one transaction.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Collection order is preserved through `students.position`.

use crate::db::migrations::latest_version;
use crate::model::attendance::{format_date_key, parse_date_key, AttendanceStatus};
use crate::model::student::{Student, StudentId};
use crate::repo::student_repo::{validate_all, RepoError, RepoResult, StudentRepository};
use log::info;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use uuid::Uuid;

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    roll_number,
    name,
    email,
    image
FROM students
ORDER BY position ASC";

const ATTENDANCE_SELECT_SQL: &str = "SELECT
    student_id,
    date_key,
    status
FROM attendance
ORDER BY student_id ASC, date_key ASC";

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `RepoError::Unavailable` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(RepoError::Unavailable(format!(
                "schema version {version} does not match expected {}",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn load_all(&self) -> RepoResult<Vec<Student>> {
        // Both reads share one snapshot.
        let tx = self.conn.unchecked_transaction()?;

        let mut students = Vec::new();
        let mut index_by_id: HashMap<StudentId, usize> = HashMap::new();
        {
            let mut stmt = tx.prepare(STUDENT_SELECT_SQL)?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let student = parse_student_row(row)?;
                index_by_id.insert(student.id, students.len());
                students.push(student);
            }
        }
        {
            let mut stmt = tx.prepare(ATTENDANCE_SELECT_SQL)?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let (student_id, date, status) = parse_attendance_row(row)?;
                let index = index_by_id.get(&student_id).copied().ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "attendance row references unknown student `{student_id}`"
                    ))
                })?;
                students[index].mark(date, status);
            }
        }
        tx.finish()?;

        for student in &students {
            student.validate().map_err(|err| {
                RepoError::InvalidData(format!("student {} in students table: {err}", student.id))
            })?;
        }
        Ok(students)
    }

    fn save_all(&self, students: &[Student]) -> RepoResult<()> {
        validate_all(students)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM attendance;", [])?;
        tx.execute("DELETE FROM students;", [])?;
        {
            let mut insert_student = tx.prepare(
                "INSERT INTO students (id, position, roll_number, name, email, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            let mut insert_attendance = tx.prepare(
                "INSERT INTO attendance (student_id, date_key, status)
                 VALUES (?1, ?2, ?3);",
            )?;

            for (position, student) in students.iter().enumerate() {
                let id = student.id.to_string();
                insert_student.execute(params![
                    id,
                    position as i64,
                    student.roll_number.as_str(),
                    student.name.as_str(),
                    student.email.as_str(),
                    student.image.as_str(),
                ])?;
                for (date, status) in &student.attendance {
                    insert_attendance.execute(params![
                        id,
                        format_date_key(*date),
                        status.as_str()
                    ])?;
                }
            }
        }
        tx.commit()?;

        info!(
            "event=store_save module=repo status=ok backend=sqlite students={}",
            students.len()
        );
        Ok(())
    }
}

fn parse_student_id(value: &str, column: &str) -> RepoResult<StudentId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id_text: String = row.get("id")?;
    let id = parse_student_id(&id_text, "students.id")?;

    Ok(Student::with_id(
        id,
        row.get::<_, String>("roll_number")?,
        row.get::<_, String>("name")?,
        row.get::<_, String>("email")?,
        row.get::<_, String>("image")?,
    ))
}

fn parse_attendance_row(
    row: &Row<'_>,
) -> RepoResult<(StudentId, chrono::NaiveDate, AttendanceStatus)> {
    let id_text: String = row.get("student_id")?;
    let student_id = parse_student_id(&id_text, "attendance.student_id")?;

    let date_text: String = row.get("date_key")?;
    let date = parse_date_key(&date_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date key `{date_text}` in attendance.date_key"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = status_text.parse::<AttendanceStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in attendance.status"
        ))
    })?;

    Ok((student_id, date, status))
}
