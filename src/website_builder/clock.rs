//! Time source for version and backup timestamps.
//!
//! Timestamps are naive local time: version records carry an ISO-8601
//! string with microseconds and backups a second-resolution stamp.

use chrono::{Duration, Local, NaiveDateTime};
use std::cell::Cell;

/// `YYYYMMDD_HHMMSS`, the stamp embedded in backup names.
pub const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn iso_timestamp(&self) -> String {
        self.now().format(ISO_FORMAT).to_string()
    }

    fn backup_stamp(&self) -> String {
        self.now().format(BACKUP_STAMP_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// Uses `Cell` since the store is single-threaded and owns its clock;
/// tests advance it through `VersionedStore::clock()`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + Duration::seconds(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        let start = NaiveDateTime::parse_from_str("2024-01-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default();
        Self::new(start)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}
