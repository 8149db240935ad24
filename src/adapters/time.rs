//! Host time adapter.
//!
//! Provides both clocks the service needs:
//!
//! - **monotonic**: milliseconds since construction, from
//!   `std::time::Instant`;
//! - **wall**: local date and time in the log's `DD-MM-YYYY` /
//!   `HH:MM:SS` layout, from `chrono::Local`.

use std::time::Instant;

use chrono::{DateTime, Datelike, Local, TimeZone};

use crate::app::ports::{MonotonicClock, Timestamp, WallClock};

/// Wall-clock readings before this year are treated as "not yet synced"
/// (an RTC that lost power boots at its epoch).
const MIN_SYNCED_YEAR: i32 = 2020;

const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

/// System clock adapter.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> Option<Timestamp> {
        format_timestamp(&Local::now())
    }
}

/// Render `at` in the log's layout.  `None` for an unsynced clock.
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> Option<Timestamp>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if at.year() < MIN_SYNCED_YEAR {
        return None;
    }
    Some(Timestamp {
        date: at.format(DATE_FORMAT).to_string(),
        time: at.format(TIME_FORMAT).to_string(),
    })
}
