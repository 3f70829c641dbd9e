//! Calendar clock seam.
//!
//! Date keys are local calendar days with no timezone attached. Every caller
//! sharing a store is assumed to share one timezone; `SystemClock` uses the
//! host's local day boundary.

use chrono::{Local, NaiveDate};

/// Source of "today" for default dates.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Host local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned calendar day, for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
