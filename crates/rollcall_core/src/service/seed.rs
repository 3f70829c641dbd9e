//! Demo roster generation.
//!
//! Not part of the reusable engine; used to bootstrap an empty store for
//! demos and smoke runs.

use crate::model::attendance::AttendanceStatus;
use crate::model::student::Student;
use chrono::{Days, NaiveDate};
use rand::Rng;

/// Days of generated history per student, today included.
pub const SEED_HISTORY_DAYS: u64 = 10;

const TODAY_PRESENT_THRESHOLD: f64 = 0.6;
const HISTORY_PRESENT_THRESHOLD: f64 = 0.3;

struct DemoStudent {
    roll_number: &'static str,
    name: &'static str,
    email_local: &'static str,
    present_today: bool,
}

const DEMO_ROSTER: [DemoStudent; 5] = [
    DemoStudent {
        roll_number: "S001",
        name: "John Doe",
        email_local: "john.doe",
        present_today: false,
    },
    DemoStudent {
        roll_number: "S002",
        name: "Jane Smith",
        email_local: "student",
        present_today: true,
    },
    DemoStudent {
        roll_number: "S003",
        name: "Peter Jones",
        email_local: "peter.jones",
        present_today: false,
    },
    DemoStudent {
        roll_number: "S004",
        name: "Mary Johnson",
        email_local: "mary.j",
        present_today: false,
    },
    DemoStudent {
        roll_number: "S005",
        name: "David Williams",
        email_local: "dave.w",
        present_today: true,
    },
];

/// Builds the demo roster with `SEED_HISTORY_DAYS` of generated history.
///
/// `roll` yields values in `[0, 1)`; a day is present when the roll exceeds
/// 0.6 for today and 0.3 for earlier days. Students flagged present today
/// are overwritten after generation.
pub fn seed_students(
    today: NaiveDate,
    email_domain: &str,
    images: &[String],
    roll: &mut dyn FnMut() -> f64,
) -> Vec<Student> {
    DEMO_ROSTER
        .iter()
        .enumerate()
        .map(|(index, demo)| {
            let image = if images.is_empty() {
                String::new()
            } else {
                images[index % images.len()].clone()
            };
            let mut student = Student::new(
                demo.roll_number,
                demo.name,
                format!("{}@{email_domain}", demo.email_local),
                image,
            );

            for offset in 0..SEED_HISTORY_DAYS {
                let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                    break;
                };
                let threshold = if offset == 0 {
                    TODAY_PRESENT_THRESHOLD
                } else {
                    HISTORY_PRESENT_THRESHOLD
                };
                let status = if roll() > threshold {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                };
                student.mark(date, status);
            }
            if demo.present_today {
                student.mark(today, AttendanceStatus::Present);
            }
            student
        })
        .collect()
}

/// Uniform roll in `[0, 1)` from the thread-local generator.
pub fn random_roll() -> f64 {
    rand::thread_rng().gen::<f64>()
}
