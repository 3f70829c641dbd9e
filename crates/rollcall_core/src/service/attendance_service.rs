//! Attendance use-case service.
//!
//! # Responsibility
//! - Apply status changes and add students through serialized
//!   read-modify-write sequences on the record store.
//! - Derive summaries, streaks and dashboards from the current snapshot.
//!
//! # Invariants
//! - Input validation runs before any store access.
//! - One call rewrites or inserts at most one attendance entry.
//! - A status change for an unknown student id is a no-op: nothing is
//!   written and the unchanged collection is returned.
//! - When persisting fails the stored snapshot is unchanged.

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, CoreConfig};
use crate::model::attendance::{AttendanceStatus, AttendanceValidationError};
use crate::model::student::{NewStudent, Student, StudentId, StudentValidationError};
use crate::repo::record_store::RecordStore;
use crate::repo::student_repo::{RepoError, StudentRepository};
use crate::service::seed::seed_students;
use crate::service::streak::current_streak;
use crate::service::summary::{
    daily_summary, month_view, student_totals, CalendarDay, DailySummary,
};
use crate::service::viewer::{AdminView, Dashboard, StudentView, Viewer};
use chrono::NaiveDate;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid email local-part regex"));

const FALLBACK_EMAIL_LOCAL: &str = "student";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for attendance use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Add-student request is missing required fields.
    InvalidStudent(StudentValidationError),
    /// Status string, date key or calendar month is malformed.
    InvalidInput(AttendanceValidationError),
    /// No student carries the requested email.
    StudentNotFoundByEmail(String),
    /// No student carries the requested id.
    StudentNotFound(StudentId),
    /// A non-admin viewer asked for someone else's record.
    Forbidden,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStudent(err) => write!(f, "{err}"),
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::StudentNotFoundByEmail(email) => {
                write!(f, "no student record for `{email}`")
            }
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::Forbidden => write!(f, "viewer may only read their own record"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidStudent(err) => Some(err),
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StudentValidationError> for ServiceError {
    fn from(value: StudentValidationError) -> Self {
        Self::InvalidStudent(value)
    }
}

impl From<AttendanceValidationError> for ServiceError {
    fn from(value: AttendanceValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Derives a student email from a display name.
///
/// The final word is treated as the surname and dropped when more than one
/// word is present; the remaining words are joined, lowercased and stripped
/// of everything outside `[a-z0-9]`.
pub fn derive_email(name: &str, domain: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let given = match words.split_last() {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => words.as_slice(),
    };
    let lowered = given.concat().to_lowercase();
    let local = NON_ALNUM_RE.replace_all(&lowered, "");
    let local = if local.is_empty() {
        FALLBACK_EMAIL_LOCAL
    } else {
        &*local
    };
    format!("{local}@{domain}")
}

/// Use-case service over an injected record store and clock.
pub struct AttendanceService<R: StudentRepository, C: Clock = SystemClock> {
    store: RecordStore<R>,
    clock: C,
    config: CoreConfig,
}

impl<R: StudentRepository> AttendanceService<R, SystemClock> {
    /// Creates a service on the host clock with default config.
    pub fn new(repo: R) -> Self {
        Self {
            store: RecordStore::new(repo),
            clock: SystemClock,
            config: CoreConfig::default(),
        }
    }
}

impl<R: StudentRepository, C: Clock> AttendanceService<R, C> {
    /// Creates a service with an explicit clock and config.
    ///
    /// `config` is validated here so derived emails always carry a domain.
    pub fn with_clock(repo: R, clock: C, config: CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: RecordStore::new(repo),
            clock,
            config,
        })
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Local calendar day used when a date argument is omitted.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.store.list()?)
    }

    pub fn find_student(&self, student_id: StudentId) -> ServiceResult<Option<Student>> {
        Ok(self.store.find(|student| student.id == student_id)?)
    }

    /// First case-insensitive email match, or `None`.
    pub fn find_by_email(&self, email: &str) -> ServiceResult<Option<Student>> {
        Ok(self.store.find(|student| student.email_matches(email))?)
    }

    /// Sets `attendance[on_date] = status` for one student.
    ///
    /// # Contract
    /// - `on_date` defaults to the clock's today.
    /// - Overwrites any earlier status for that date; other dates untouched.
    /// - Unknown `student_id` returns the unchanged collection without a write.
    pub fn set_status(
        &self,
        student_id: StudentId,
        status: AttendanceStatus,
        on_date: Option<NaiveDate>,
    ) -> ServiceResult<Vec<Student>> {
        let date = on_date.unwrap_or_else(|| self.clock.today());

        let mut applied = false;
        let result = self.store.update(|students: &mut Vec<Student>| {
            let Some(student) = students.iter_mut().find(|student| student.id == student_id)
            else {
                return Ok::<_, ServiceError>(false);
            };
            student.mark(date, status);
            applied = true;
            Ok(true)
        });

        match &result {
            Ok(_) if applied => info!(
                "event=attendance_set module=service status=ok student_id={student_id} date={date} value={status}"
            ),
            Ok(_) => warn!(
                "event=attendance_set module=service status=skipped reason=student_not_found student_id={student_id} date={date}"
            ),
            Err(err) => error!(
                "event=attendance_set module=service status=error student_id={student_id} date={date} error={err}"
            ),
        }
        result
    }

    /// Same as `set_status`, parsing the wire form (`PRESENT`/`ABSENT`) first.
    pub fn set_status_str(
        &self,
        student_id: StudentId,
        status: &str,
        on_date: Option<NaiveDate>,
    ) -> ServiceResult<Vec<Student>> {
        let status = status.parse::<AttendanceStatus>()?;
        self.set_status(student_id, status, on_date)
    }

    /// Adds one student and returns the updated collection.
    ///
    /// # Contract
    /// - Rejects blank name or roll number before touching the store.
    /// - Email defaults to `derive_email(name, config.email_domain)`.
    /// - Image defaults to `default_images[count mod len]`.
    /// - Today is seeded `ABSENT`.
    pub fn add_student(&self, request: NewStudent) -> ServiceResult<Vec<Student>> {
        request.validate()?;
        let today = self.clock.today();
        let name = request.name.trim().to_string();
        let email = request
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| derive_email(&name, &self.config.email_domain));
        let explicit_image = request.image.filter(|image| !image.trim().is_empty());

        let mut created_id = None;
        let result = self.store.update(|students: &mut Vec<Student>| {
            let image = match &explicit_image {
                Some(image) => image.clone(),
                None => self.rotation_image(students.len()),
            };
            let mut student = Student::with_id(
                Uuid::new_v4(),
                request.roll_number.trim(),
                name.as_str(),
                email.as_str(),
                image,
            );
            student.mark(today, AttendanceStatus::Absent);
            created_id = Some(student.id);
            students.push(student);
            Ok::<_, ServiceError>(true)
        });

        match (&result, created_id) {
            (Ok(students), Some(id)) => info!(
                "event=student_add module=service status=ok student_id={id} students={}",
                students.len()
            ),
            (Err(err), _) => error!("event=student_add module=service status=error error={err}"),
            _ => {}
        }
        result
    }

    /// Daily summary for `date` (default today) over the current snapshot.
    pub fn summary_for(&self, date: Option<NaiveDate>) -> ServiceResult<DailySummary> {
        let date = date.unwrap_or_else(|| self.clock.today());
        Ok(daily_summary(&self.store.list()?, date))
    }

    /// Current streak for one student, `None` when the id is unknown.
    pub fn streak_for(
        &self,
        student_id: StudentId,
        as_of: Option<NaiveDate>,
    ) -> ServiceResult<Option<u32>> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        Ok(self
            .find_student(student_id)?
            .map(|student| current_streak(&student, as_of)))
    }

    /// Month calendar for one student with tri-state day status.
    pub fn month_view_for(
        &self,
        student_id: StudentId,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<CalendarDay>> {
        let student = self
            .find_student(student_id)?
            .ok_or(ServiceError::StudentNotFound(student_id))?;
        Ok(month_view(&student, year, month)?)
    }

    /// Resolves the viewer's dashboard for `date` (default today).
    ///
    /// Admins get the whole class; users get the record whose email matches
    /// their `user_id`.
    pub fn dashboard(&self, viewer: &Viewer, date: Option<NaiveDate>) -> ServiceResult<Dashboard> {
        let date = date.unwrap_or_else(|| self.clock.today());
        if viewer.is_admin() {
            let students = self.store.list()?;
            let summary = daily_summary(&students, date);
            return Ok(Dashboard::Admin(AdminView {
                date,
                students,
                summary,
            }));
        }
        self.student_view(&viewer.user_id, date)
            .map(Dashboard::Student)
    }

    /// Opens one student's dashboard by email on behalf of `viewer`.
    ///
    /// Admins may open any record; users only their own.
    pub fn view_as(
        &self,
        viewer: &Viewer,
        email: &str,
        date: Option<NaiveDate>,
    ) -> ServiceResult<StudentView> {
        if !viewer.is_admin() && viewer.user_id.to_lowercase() != email.to_lowercase() {
            warn!("event=view_as module=service status=error error_code=forbidden");
            return Err(ServiceError::Forbidden);
        }
        let date = date.unwrap_or_else(|| self.clock.today());
        self.student_view(email, date)
    }

    /// Seeds the demo roster when the store is empty.
    ///
    /// Returns the collection as stored afterwards; a non-empty store is left
    /// as is.
    pub fn bootstrap(&self, roll: &mut dyn FnMut() -> f64) -> ServiceResult<Vec<Student>> {
        let today = self.clock.today();
        let students = self.store.update(|students: &mut Vec<Student>| {
            if !students.is_empty() {
                return Ok::<_, ServiceError>(false);
            }
            *students = seed_students(
                today,
                &self.config.email_domain,
                &self.config.default_images,
                roll,
            );
            Ok(true)
        })?;
        info!(
            "event=store_bootstrap module=service status=ok students={}",
            students.len()
        );
        Ok(students)
    }

    fn student_view(&self, email: &str, date: NaiveDate) -> ServiceResult<StudentView> {
        let student = self
            .find_by_email(email)?
            .ok_or_else(|| ServiceError::StudentNotFoundByEmail(email.to_string()))?;
        Ok(StudentView {
            date,
            status: student.status_on(date),
            streak: current_streak(&student, date),
            totals: student_totals(&student),
            student,
        })
    }

    fn rotation_image(&self, count: usize) -> String {
        let images = &self.config.default_images;
        if images.is_empty() {
            return String::new();
        }
        images[count % images.len()].clone()
    }
}
