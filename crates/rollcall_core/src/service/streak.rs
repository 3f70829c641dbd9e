//! Consecutive-attendance streak.
//!
//! A streak is measured relative to "in good standing as of today": the walk
//! starts at `as_of` and any non-present day ends it. A non-present `as_of`
//! therefore yields zero no matter how long the run before it was.

use crate::model::student::Student;
use chrono::NaiveDate;

/// Upper bound of the backward walk; streaks never exceed one year.
pub const STREAK_WINDOW_DAYS: u32 = 365;

/// Counts consecutive `PRESENT` days ending at `as_of`.
pub fn current_streak(student: &Student, as_of: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = as_of;

    for _ in 0..STREAK_WINDOW_DAYS {
        if !student.status_on(day).is_present() {
            break;
        }
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::{current_streak, STREAK_WINDOW_DAYS};
    use crate::model::attendance::AttendanceStatus;
    use crate::model::student::Student;
    use chrono::{Days, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn student() -> Student {
        Student::new("S001", "John Doe", "john@example.com", "a.png")
    }

    #[test]
    fn three_present_days_give_streak_of_three() {
        let mut s = student();
        s.mark(date(2024, 7, 29), AttendanceStatus::Present);
        s.mark(date(2024, 7, 30), AttendanceStatus::Present);
        s.mark(date(2024, 7, 31), AttendanceStatus::Present);

        assert_eq!(current_streak(&s, date(2024, 7, 31)), 3);
    }

    #[test]
    fn absent_today_zeroes_streak() {
        let mut s = student();
        s.mark(date(2024, 7, 29), AttendanceStatus::Present);
        s.mark(date(2024, 7, 30), AttendanceStatus::Present);
        s.mark(date(2024, 7, 31), AttendanceStatus::Absent);

        assert_eq!(current_streak(&s, date(2024, 7, 31)), 0);
    }

    #[test]
    fn unmarked_today_zeroes_streak() {
        let mut s = student();
        s.mark(date(2024, 7, 30), AttendanceStatus::Present);

        assert_eq!(current_streak(&s, date(2024, 7, 31)), 0);
    }

    #[test]
    fn gap_ends_streak() {
        let mut s = student();
        s.mark(date(2024, 7, 27), AttendanceStatus::Present);
        s.mark(date(2024, 7, 30), AttendanceStatus::Present);
        s.mark(date(2024, 7, 31), AttendanceStatus::Present);

        assert_eq!(current_streak(&s, date(2024, 7, 31)), 2);
    }

    #[test]
    fn streak_crosses_month_and_year_boundaries() {
        let mut s = student();
        s.mark(date(2023, 12, 31), AttendanceStatus::Present);
        s.mark(date(2024, 1, 1), AttendanceStatus::Present);

        assert_eq!(current_streak(&s, date(2024, 1, 1)), 2);
    }

    #[test]
    fn streak_is_capped_at_one_year() {
        let as_of = date(2024, 7, 31);
        let mut s = student();
        for offset in 0..500 {
            s.mark(as_of - Days::new(offset), AttendanceStatus::Present);
        }

        assert_eq!(current_streak(&s, as_of), STREAK_WINDOW_DAYS);
    }

    #[test]
    fn future_entries_do_not_count() {
        let mut s = student();
        s.mark(date(2024, 8, 1), AttendanceStatus::Present);
        s.mark(date(2024, 7, 31), AttendanceStatus::Present);

        assert_eq!(current_streak(&s, date(2024, 7, 31)), 1);
    }
}
