//! Elapsed-time handling for schedule times.
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};

/// Elapsed time since midnight of the service day, in seconds.
///
/// GTFS lets the hour exceed 23 to describe a trip continuing past
/// midnight, so `25:10:00` means 1:10 on the following calendar day and is
/// never wrapped onto a 24-hour clock. The difference of two times can be
/// negative when the feed data is internally inconsistent, which is why the
/// representation is signed.
#[derive(PartialOrd, Ord, PartialEq, Eq, Copy, Clone, Debug, Default, Hash)]
pub struct ServiceTime(
    /// Seconds since midnight of the service day
    pub i32,
);

impl ServiceTime {
    /// Zero elapsed time, also the fallback for malformed time fields
    pub const ZERO: ServiceTime = ServiceTime(0);

    /// Builds a time from hours, minutes and seconds. Hours above 23 stay as
    /// given. A total that does not fit the representation resolves to zero
    /// elapsed time, like any other malformed time field.
    pub fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Self {
        hours
            .checked_mul(3600)
            .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
            .and_then(|total| total.checked_add(seconds))
            .map(ServiceTime)
            .unwrap_or(ServiceTime::ZERO)
    }

    /// The elapsed time in whole seconds
    pub fn as_secs(&self) -> i32 {
        self.0
    }
}

impl Sub for ServiceTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ServiceTime(self.0 - rhs.0)
    }
}

impl Add for ServiceTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ServiceTime(self.0 + rhs.0)
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let secs = self.0.abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{:02}:{:02}:{:02}",
            sign,
            secs / 3600,
            secs % 3600 / 60,
            secs % 60
        )
    }
}

impl Serialize for ServiceTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Parses a `HH:MM:SS` schedule time, keeping hours above 23 as-is.
///
/// A malformed value (wrong field count, non-numeric content, empty string,
/// a total too large to represent) resolves to zero elapsed time rather than
/// failing the load.
pub fn parse_service_time(s: &str) -> ServiceTime {
    let mut parts = s.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(sec), None) => {
            match (h.parse::<i32>(), m.parse::<i32>(), sec.parse::<i32>()) {
                (Ok(h), Ok(m), Ok(sec)) => ServiceTime::from_hms(h, m, sec),
                _ => ServiceTime::ZERO,
            }
        }
        _ => ServiceTime::ZERO,
    }
}
