use chrono::NaiveDate;
use rollcall_core::db::{open_db, open_db_in_memory};
use rollcall_core::{
    AttendanceService, AttendanceStatus, CoreConfig, DayStatus, FixedClock,
    JsonFileStudentRepository, NewStudent, RecordStore, RepoError, SqliteStudentRepository,
    Student, StudentRepository,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
}

fn sample() -> Vec<Student> {
    let mut first = Student::new("S002", "Jane Smith", "jane@example.com", "b.png");
    first.mark(day(30), AttendanceStatus::Present);
    first.mark(day(31), AttendanceStatus::Absent);
    let mut second = Student::new("S001", "John Doe", "john@example.com", "a.png");
    second.mark(day(31), AttendanceStatus::Present);
    let third = Student::new("S003", "Peter Jones", "peter@example.com", "c.png");
    vec![first, second, third]
}

#[test]
fn sqlite_save_then_load_preserves_order_and_attendance() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let students = sample();
    repo.save_all(&students).unwrap();
    assert_eq!(repo.load_all().unwrap(), students);
}

#[test]
fn sqlite_save_replaces_previous_collection() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    repo.save_all(&sample()).unwrap();
    let replacement = vec![Student::new("S009", "Only One", "one@example.com", "x.png")];
    repo.save_all(&replacement).unwrap();

    assert_eq!(repo.load_all().unwrap(), replacement);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendance;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn sqlite_failed_save_rolls_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let original = sample();
    repo.save_all(&original).unwrap();

    // Duplicate ids violate the primary key halfway through the write.
    let duplicate = original[0].clone();
    let mut broken = original.clone();
    broken.push(duplicate);
    let err = repo.save_all(&broken).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert_eq!(repo.load_all().unwrap(), original);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollcall.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteStudentRepository::try_new(&conn).unwrap();
        let service =
            AttendanceService::with_clock(repo, FixedClock(day(31)), CoreConfig::default())
                .unwrap();
        let students = service
            .add_student(NewStudent::new("S001", "John Doe"))
            .unwrap();
        let id = students[0].id;
        service.set_status(id, AttendanceStatus::Present, None).unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let store = RecordStore::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let student = store.find(|s| s.id == id).unwrap().unwrap();
    assert_eq!(student.email, "john@example.com");
    assert_eq!(student.status_on(day(31)), DayStatus::Present);
}

#[test]
fn json_store_drives_service_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.json");

    let service = AttendanceService::with_clock(
        JsonFileStudentRepository::new(&path),
        FixedClock(day(31)),
        CoreConfig::default(),
    )
    .unwrap();
    let students = service
        .add_student(NewStudent::new("S001", "Mary Ann O'Brien"))
        .unwrap();
    service
        .set_status(students[0].id, AttendanceStatus::Present, Some(day(30)))
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["email"], "maryann@example.com");
    assert_eq!(value[0]["attendance"]["2024-07-30"], "PRESENT");
    assert_eq!(value[0]["attendance"]["2024-07-31"], "ABSENT");

    let reloaded = JsonFileStudentRepository::new(&path).load_all().unwrap();
    assert_eq!(reloaded, service.list_students().unwrap());
}

#[test]
fn json_store_rejects_unknown_status_in_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.json");
    std::fs::write(
        &path,
        r#"[{"id":"6f1c2b9e-3d4a-4b8e-9f00-0a1b2c3d4e5f","rollNumber":"S001","name":"John","email":"john@example.com","image":"a.png","attendance":{"2024-07-31":"LATE"}}]"#,
    )
    .unwrap();

    let err = JsonFileStudentRepository::new(&path).load_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn json_store_rejects_non_canonical_and_duplicate_date_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.json");
    let blob = |attendance: &str| {
        format!(
            r#"[{{"id":"6f1c2b9e-3d4a-4b8e-9f00-0a1b2c3d4e5f","rollNumber":"S001","name":"John","email":"john@example.com","image":"a.png","attendance":{attendance}}}]"#
        )
    };
    let repo = JsonFileStudentRepository::new(&path);

    for attendance in [
        r#"{"2024-07-31":"PRESENT","2024-7-31":"ABSENT"}"#,
        r#"{" 2024-07-30":"PRESENT"}"#,
        r#"{"2024-07-31":"PRESENT","2024-07-31":"ABSENT"}"#,
    ] {
        std::fs::write(&path, blob(attendance)).unwrap();
        let err = repo.load_all().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)), "{attendance}");
    }

    std::fs::write(&path, blob(r#"{"2024-07-31":"PRESENT"}"#)).unwrap();
    let students = repo.load_all().unwrap();
    assert_eq!(students[0].status_on(day(31)), DayStatus::Present);
}

#[test]
fn bootstrap_seeds_only_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.json");
    let service = AttendanceService::with_clock(
        JsonFileStudentRepository::new(&path),
        FixedClock(day(31)),
        CoreConfig::default(),
    )
    .unwrap();

    let seeded = service.bootstrap(&mut || 0.5).unwrap();
    assert_eq!(seeded.len(), 5);
    assert_eq!(seeded[1].email, "student@example.com");
    assert_eq!(seeded[1].status_on(day(31)), DayStatus::Present);

    let again = service.bootstrap(&mut || 0.99).unwrap();
    assert_eq!(again, seeded);
}
