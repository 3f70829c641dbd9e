//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `rollcall_core` linkage with a version probe.
//! - Drive the attendance service against a JSON store for local checks.
//!
//! Environment:
//! - `ROLLCALL_CONFIG`: optional path to a JSON `CoreConfig`.
//! - `ROLLCALL_LOG_DIR`: optional absolute directory for rolling logs.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rollcall_core::{
    parse_date_key, random_roll, AttendanceService, AttendanceStatus, CoreConfig,
    JsonFileStudentRepository, NewStudent, ServiceError, StudentId, SystemClock, Viewer,
};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

type Service = AttendanceService<JsonFileStudentRepository, SystemClock>;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Rollcall attendance CLI")]
struct Cli {
    /// JSON student store.
    #[arg(long, global = true, default_value = "students.json")]
    store: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the demo roster if the store is empty.
    Seed,
    /// List students with today's status.
    List,
    /// Add a student; email and image are derived when omitted.
    Add {
        roll_number: String,
        #[arg(required = true)]
        name: Vec<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Set one student's status for a date (default today).
    Mark {
        #[arg(value_parser = parse_student_id)]
        id: StudentId,
        #[arg(value_enum, ignore_case = true)]
        status: StatusCli,
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Daily class summary for a date (default today).
    Summary {
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Student dashboard by email, opened as admin.
    View {
        email: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Month calendar for one student.
    Month {
        #[arg(value_parser = parse_student_id)]
        id: StudentId,
        year: i32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
enum StatusCli {
    Present,
    Absent,
}

impl From<StatusCli> for AttendanceStatus {
    fn from(value: StatusCli) -> Self {
        match value {
            StatusCli::Present => Self::Present,
            StatusCli::Absent => Self::Absent,
        }
    }
}

fn parse_student_id(value: &str) -> Result<StudentId, String> {
    value
        .parse::<StudentId>()
        .map_err(|err| format!("invalid student id `{value}`: {err}"))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_date_key(value).map_err(|err| err.to_string())
}

fn load_config() -> Result<CoreConfig, String> {
    match env::var("ROLLCALL_CONFIG") {
        Ok(path) => CoreConfig::load(&path).map_err(|err| err.to_string()),
        Err(_) => Ok(CoreConfig::default()),
    }
}

fn open_service(store: PathBuf) -> Result<Service, String> {
    let config = load_config()?;
    if let Ok(log_dir) = env::var("ROLLCALL_LOG_DIR") {
        rollcall_core::init_logging(&config.log_level, log_dir)?;
    }
    AttendanceService::with_clock(JsonFileStudentRepository::new(store), SystemClock, config)
        .map_err(|err| err.to_string())
}

fn run_command(service: &Service, command: Commands) -> Result<(), String> {
    let fail = |err: ServiceError| err.to_string();

    match command {
        Commands::Seed => {
            let students = service.bootstrap(&mut random_roll).map_err(fail)?;
            println!("students={}", students.len());
        }
        Commands::List => {
            let today = service.today();
            for student in service.list_students().map_err(fail)? {
                println!(
                    "{} {} {} {:?}",
                    student.id,
                    student.roll_number,
                    student.email,
                    student.status_on(today)
                );
            }
        }
        Commands::Add {
            roll_number,
            name,
            email,
            image,
        } => {
            let request = NewStudent {
                email,
                image,
                ..NewStudent::new(roll_number, name.join(" "))
            };
            let students = service.add_student(request).map_err(fail)?;
            if let Some(added) = students.last() {
                println!("added id={} email={}", added.id, added.email);
            }
        }
        Commands::Mark { id, status, date } => {
            let status = AttendanceStatus::from(status);
            let students = service.set_status(id, status, date).map_err(fail)?;
            if !students.iter().any(|student| student.id == id) {
                return Err(format!("no student with id {id}; nothing written"));
            }
            println!("marked id={id} status={status}");
        }
        Commands::Summary { date } => {
            let summary = service.summary_for(date).map_err(fail)?;
            println!(
                "present={} absent={} total={} percentage={:.1}",
                summary.present, summary.absent, summary.total, summary.percentage
            );
        }
        Commands::View { email, date } => {
            let view = service
                .view_as(&Viewer::admin("cli"), &email, date)
                .map_err(fail)?;
            println!(
                "{} status={:?} streak={} present_days={} absent_days={}",
                view.student.roll_number,
                view.status,
                view.streak,
                view.totals.present_days,
                view.totals.absent_days
            );
        }
        Commands::Month { id, year, month } => {
            for day in service.month_view_for(id, year, month).map_err(fail)? {
                println!("{} {:?}", day.date, day.status);
            }
        }
    }
    Ok(())
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("rollcall_core ping={}", rollcall_core::ping());
        println!("rollcall_core version={}", rollcall_core::core_version());
        return Ok(());
    };
    let service = open_service(cli.store)?;
    run_command(&service, command)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
