//! Source of "now" for server-assigned defaults.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Wall-clock time in the server's local timezone.
pub trait Clock: Send + Sync {
  fn now(&self) -> NaiveDateTime;

  fn today(&self) -> NaiveDate { self.now().date() }
}

/// The real local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}

/// A clock frozen at a single instant — useful for testing.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime { self.0 }
}
