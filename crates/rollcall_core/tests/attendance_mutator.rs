use chrono::NaiveDate;
use rollcall_core::{
    AttendanceService, AttendanceStatus, ConfigError, CoreConfig, DayStatus, FixedClock,
    MemoryStudentRepository, NewStudent, RepoError, RepoResult, ServiceError, Student,
    StudentRepository, StudentValidationError,
};
use std::cell::Cell;
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
}

fn service_on(
    today: NaiveDate,
    students: Vec<Student>,
) -> AttendanceService<MemoryStudentRepository, FixedClock> {
    AttendanceService::with_clock(
        MemoryStudentRepository::with_students(students),
        FixedClock(today),
        CoreConfig::default(),
    )
    .unwrap()
}

fn student(roll: &str) -> Student {
    Student::new(
        roll,
        format!("Student {roll}"),
        format!("{}@example.com", roll.to_lowercase()),
        "a.png",
    )
}

struct FlakyRepository {
    inner: MemoryStudentRepository,
    fail_writes: Cell<bool>,
}

impl StudentRepository for FlakyRepository {
    fn load_all(&self) -> RepoResult<Vec<Student>> {
        self.inner.load_all()
    }

    fn save_all(&self, students: &[Student]) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("disk detached".to_string()));
        }
        self.inner.save_all(students)
    }
}

#[test]
fn set_status_writes_only_the_requested_date() {
    let mut seeded = student("S001");
    seeded.mark(day(29), AttendanceStatus::Present);
    seeded.mark(day(30), AttendanceStatus::Absent);
    let other = student("S002");
    let id = seeded.id;
    let service = service_on(day(31), vec![seeded, other.clone()]);

    let students = service
        .set_status(id, AttendanceStatus::Present, Some(day(30)))
        .unwrap();

    let updated = students.iter().find(|s| s.id == id).unwrap();
    assert_eq!(updated.status_on(day(30)), DayStatus::Present);
    assert_eq!(updated.status_on(day(29)), DayStatus::Present);
    assert_eq!(updated.status_on(day(31)), DayStatus::Unmarked);
    assert_eq!(updated.attendance.len(), 2);
    assert_eq!(students.iter().find(|s| s.id == other.id), Some(&other));

    let reread = service.find_student(id).unwrap().unwrap();
    assert_eq!(&reread, updated);
}

#[test]
fn set_status_defaults_to_clock_today() {
    let seeded = student("S001");
    let id = seeded.id;
    let service = service_on(day(31), vec![seeded]);

    service.set_status(id, AttendanceStatus::Present, None).unwrap();

    let reread = service.find_student(id).unwrap().unwrap();
    assert_eq!(reread.status_on(day(31)), DayStatus::Present);
}

#[test]
fn set_status_is_idempotent() {
    let seeded = student("S001");
    let id = seeded.id;
    let service = service_on(day(31), vec![seeded]);

    let once = service
        .set_status(id, AttendanceStatus::Absent, Some(day(31)))
        .unwrap();
    let twice = service
        .set_status(id, AttendanceStatus::Absent, Some(day(31)))
        .unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice[0].attendance.len(), 1);
}

#[test]
fn set_status_overwrites_previous_value() {
    let seeded = student("S001");
    let id = seeded.id;
    let service = service_on(day(31), vec![seeded]);

    service.set_status(id, AttendanceStatus::Absent, None).unwrap();
    let students = service.set_status(id, AttendanceStatus::Present, None).unwrap();

    assert_eq!(students[0].status_on(day(31)), DayStatus::Present);
    assert_eq!(students[0].attendance.len(), 1);
}

#[test]
fn set_status_for_unknown_student_is_a_no_op() {
    let seeded = vec![student("S001"), student("S002")];
    let repo = FlakyRepository {
        inner: MemoryStudentRepository::with_students(seeded.clone()),
        fail_writes: Cell::new(true),
    };
    let service =
        AttendanceService::with_clock(repo, FixedClock(day(31)), CoreConfig::default())
            .unwrap();

    // Writes would fail, so success proves nothing was persisted.
    let students = service
        .set_status(Uuid::new_v4(), AttendanceStatus::Present, None)
        .unwrap();
    assert_eq!(students, seeded);
}

#[test]
fn set_status_str_rejects_unknown_values_before_store_access() {
    let seeded = student("S001");
    let id = seeded.id;
    let service = service_on(day(31), vec![seeded.clone()]);

    let err = service.set_status_str(id, "LATE", None).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(service.list_students().unwrap(), vec![seeded]);

    let students = service.set_status_str(id, "PRESENT", None).unwrap();
    assert_eq!(students[0].status_on(day(31)), DayStatus::Present);
}

#[test]
fn persist_failure_is_reported_and_leaves_store_unchanged() {
    let seeded = student("S001");
    let id = seeded.id;
    let repo = FlakyRepository {
        inner: MemoryStudentRepository::with_students(vec![seeded.clone()]),
        fail_writes: Cell::new(true),
    };
    let service =
        AttendanceService::with_clock(repo, FixedClock(day(31)), CoreConfig::default())
            .unwrap();

    let err = service
        .set_status(id, AttendanceStatus::Present, None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::Unavailable(_))));
    assert_eq!(service.list_students().unwrap(), vec![seeded.clone()]);

    let err = service
        .add_student(NewStudent::new("S002", "Jane Smith"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
    assert_eq!(service.list_students().unwrap(), vec![seeded]);

    service.store().repository().fail_writes.set(false);
    service.set_status(id, AttendanceStatus::Present, None).unwrap();
    assert_eq!(
        service.find_student(id).unwrap().unwrap().status_on(day(31)),
        DayStatus::Present
    );
}

#[test]
fn add_student_derives_email_and_seeds_today_absent() {
    let service = service_on(day(31), Vec::new());

    let students = service
        .add_student(NewStudent::new("S010", "Mary Ann O'Brien"))
        .unwrap();

    assert_eq!(students.len(), 1);
    let added = &students[0];
    assert_eq!(added.email, "maryann@example.com");
    assert_eq!(added.name, "Mary Ann O'Brien");
    assert_eq!(added.roll_number, "S010");
    assert_eq!(added.status_on(day(31)), DayStatus::Absent);
    assert_eq!(added.attendance.len(), 1);
    assert!(service.find_by_email("MARYANN@example.com").unwrap().is_some());
}

#[test]
fn add_student_keeps_supplied_email_and_image() {
    let service = service_on(day(31), Vec::new());
    let request = NewStudent {
        roll_number: "S011".to_string(),
        name: "Peter Jones".to_string(),
        email: Some("peter.jones@school.test".to_string()),
        image: Some("data:image/png;base64,AAAA".to_string()),
    };

    let students = service.add_student(request).unwrap();
    assert_eq!(students[0].email, "peter.jones@school.test");
    assert_eq!(students[0].image, "data:image/png;base64,AAAA");
}

#[test]
fn service_rejects_config_without_email_domain() {
    let config = CoreConfig {
        email_domain: "  ".to_string(),
        ..CoreConfig::default()
    };
    let result = AttendanceService::with_clock(
        MemoryStudentRepository::new(),
        FixedClock(day(31)),
        config,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn add_student_rotates_default_images_by_collection_size() {
    let config = CoreConfig {
        default_images: vec!["one.png".to_string(), "two.png".to_string()],
        ..CoreConfig::default()
    };
    let service = AttendanceService::with_clock(
        MemoryStudentRepository::new(),
        FixedClock(day(31)),
        config,
    )
    .unwrap();

    for (index, name) in ["Ann Lee", "Bob Ray", "Cat Fox"].iter().enumerate() {
        service
            .add_student(NewStudent::new(format!("S{index}"), *name))
            .unwrap();
    }

    let images: Vec<String> = service
        .list_students()
        .unwrap()
        .into_iter()
        .map(|s| s.image)
        .collect();
    assert_eq!(images, vec!["one.png", "two.png", "one.png"]);
}

#[test]
fn add_student_generates_unique_ids() {
    let service = service_on(day(31), Vec::new());
    service.add_student(NewStudent::new("S1", "Ann Lee")).unwrap();
    let students = service.add_student(NewStudent::new("S2", "Ann Lee")).unwrap();

    assert_eq!(students.len(), 2);
    assert_ne!(students[0].id, students[1].id);
}

#[test]
fn add_student_rejects_missing_required_fields() {
    let service = service_on(day(31), Vec::new());

    let err = service.add_student(NewStudent::new("S1", " ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidStudent(StudentValidationError::EmptyName)
    ));
    let err = service.add_student(NewStudent::new("", "Ann Lee")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidStudent(StudentValidationError::EmptyRollNumber)
    ));
    assert!(service.list_students().unwrap().is_empty());
}
