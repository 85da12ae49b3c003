//! Time keeping

use chrono::{DateTime, Duration, NaiveDateTime};
use embassy_time::Instant;

/// Source of the current local wall-clock time
pub trait TimeSource {
    fn now(&self) -> NaiveDateTime;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// A known wall-clock time and the system instant it was taken at
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::default(),
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }

    /// Create new time reference from a UNIX timestamp in seconds
    pub fn from_timestamp(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|time| Self::from_datetime(time.naive_utc()))
    }
}

/// Wall clock derived from a reference time and the monotonic system timer
pub struct TimeManager {
    reference: TimeReference,
    /// Offset of local time from UTC in seconds
    utc_offset: i32,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(utc_offset: i32) -> Self {
        Self {
            reference: TimeReference::default(),
            utc_offset,
        }
    }

    /// Current UTC time
    pub fn utc_now(&self) -> NaiveDateTime {
        let elapsed = Instant::now()
            .duration_since(self.reference.instant)
            .as_micros();
        let elapsed = Duration::microseconds(elapsed.min(i64::MAX as u64) as i64);

        self.reference
            .time
            .checked_add_signed(elapsed)
            .unwrap_or(self.reference.time)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
        debug!("time reference updated");
    }

    pub fn set_utc_offset(&mut self, utc_offset: i32) {
        self.utc_offset = utc_offset;
    }
}

impl TimeSource for TimeManager {
    fn now(&self) -> NaiveDateTime {
        let utc = self.utc_now();
        utc.checked_add_signed(Duration::seconds(self.utc_offset as i64))
            .unwrap_or(utc)
    }
}
