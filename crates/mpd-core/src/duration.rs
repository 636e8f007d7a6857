//! Elapsed-time value used for MPD duration attributes.
//!
//! A [`Duration`] is a signed count of nanosecond ticks. It is an elapsed
//! time, not a calendar span: there are no month or year units and a day is
//! always 24 hours. The text form lives in [`crate::xsd`].

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DurationError;

// ─── Unit ladder ─────────────────────────────────────────────────────────────

/// One tick.
pub const NANOSECOND: Duration = Duration(1);
pub const MICROSECOND: Duration = Duration(1_000 * NANOSECOND.0);
pub const MILLISECOND: Duration = Duration(1_000 * MICROSECOND.0);
pub const SECOND: Duration = Duration(1_000 * MILLISECOND.0);
pub const MINUTE: Duration = Duration(60 * SECOND.0);
pub const HOUR: Duration = Duration(60 * MINUTE.0);

// ─── Duration ────────────────────────────────────────────────────────────────

/// Elapsed time with nanosecond resolution.
///
/// Compose values from the unit constants:
///
/// ```
/// use mpd_core::{Duration, MINUTE, SECOND};
///
/// let d = 5 * MINUTE + 30 * SECOND;
/// assert_eq!(d.to_string(), "PT5M30S");
/// assert_eq!(d, "PT5M30S".parse::<Duration>().unwrap());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(nanos)
    }

    /// Exact tick count.
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value, saturating at the largest positive duration.
    #[inline]
    pub const fn abs(self) -> Self {
        Duration(self.0.saturating_abs())
    }

    pub fn checked_add(self, rhs: Duration) -> Option<Duration> {
        self.0.checked_add(rhs.0).map(Duration)
    }

    pub fn checked_sub(self, rhs: Duration) -> Option<Duration> {
        self.0.checked_sub(rhs.0).map(Duration)
    }

    pub fn checked_mul(self, rhs: i64) -> Option<Duration> {
        self.0.checked_mul(rhs).map(Duration)
    }

    pub fn checked_neg(self) -> Option<Duration> {
        self.0.checked_neg().map(Duration)
    }

    // The float accessors split off the whole units before converting, so
    // truncating the result matches integer division even where
    // `nanos as f64 / 1e9` would round across a unit boundary.

    /// Duration as a floating point number of seconds.
    pub fn seconds(self) -> f64 {
        let sec = self.0 / SECOND.0;
        let nsec = self.0 % SECOND.0;
        sec as f64 + nsec as f64 / 1e9
    }

    /// Duration as a floating point number of minutes.
    pub fn minutes(self) -> f64 {
        let min = self.0 / MINUTE.0;
        let nsec = self.0 % MINUTE.0;
        min as f64 + nsec as f64 / (60.0 * 1e9)
    }

    /// Duration as a floating point number of hours.
    pub fn hours(self) -> f64 {
        let hour = self.0 / HOUR.0;
        let nsec = self.0 % HOUR.0;
        hour as f64 + nsec as f64 / (60.0 * 60.0 * 1e9)
    }

    /// Round toward zero to a multiple of `m`. Returns `self` unchanged when
    /// `m <= 0`.
    pub fn truncate(self, m: Duration) -> Duration {
        if m.0 <= 0 {
            return self;
        }
        Duration(self.0 - self.0 % m.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self)
    }
}

// ─── Arithmetic ──────────────────────────────────────────────────────────────
//
// The operators overflow like plain `i64` arithmetic: a panic in debug builds,
// wrapping in release. Use the `checked_*` methods on untrusted values.

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        self.0 -= rhs.0;
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, rhs: i64) -> Duration {
        Duration(self.0 * rhs)
    }
}

impl Mul<Duration> for i64 {
    type Output = Duration;

    fn mul(self, rhs: Duration) -> Duration {
        Duration(self * rhs.0)
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, Add::add)
    }
}

// ─── std::time interop ───────────────────────────────────────────────────────

impl TryFrom<std::time::Duration> for Duration {
    type Error = DurationError;

    fn try_from(d: std::time::Duration) -> Result<Self, Self::Error> {
        i64::try_from(d.as_nanos())
            .map(Duration)
            .map_err(|_| DurationError::OutOfRange)
    }
}

impl TryFrom<Duration> for std::time::Duration {
    type Error = DurationError;

    fn try_from(d: Duration) -> Result<Self, Self::Error> {
        if d.is_negative() {
            return Err(DurationError::Negative);
        }
        Ok(std::time::Duration::from_nanos(d.0 as u64))
    }
}

// ─── Attribute serde ─────────────────────────────────────────────────────────

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_negative() {
            return Err(serde::ser::Error::custom(DurationError::Negative));
        }
        serializer.collect_str(self)
    }
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an XML duration such as PT1H30M")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(DurationVisitor)
    }
}
