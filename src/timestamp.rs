use std::cmp;
use std::fmt;
use std::ops;
use std::time;

use serde::{
    de::{Deserialize, Deserializer, Visitor},
    ser::{Serialize, Serializer},
};

/// Structure for holding a raw AMQP timestamp: a signed count of
/// milliseconds since the Unix epoch, ignoring leap seconds.
///
/// The wire form is a 64-bit big-endian integer; this type does no calendar
/// math beyond second/millisecond splitting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    millis: i64,
}

impl Timestamp {
    /// Create a timestamp from a raw milliseconds-since-epoch value.
    pub fn from_millis(millis: i64) -> Timestamp {
        Timestamp { millis }
    }

    /// Create a timestamp from whole seconds since the epoch. Saturates at
    /// the representable range.
    pub fn from_secs(secs: i64) -> Timestamp {
        Timestamp {
            millis: secs.saturating_mul(1000),
        }
    }

    /// Minimum possible time that can be represented
    pub fn min_value() -> Timestamp {
        Timestamp { millis: i64::MIN }
    }

    /// Maximum possible time that can be represented
    pub fn max_value() -> Timestamp {
        Timestamp { millis: i64::MAX }
    }

    /// The raw milliseconds-since-epoch count.
    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// Whole seconds since the epoch, rounding toward negative infinity.
    pub fn as_secs(&self) -> i64 {
        self.millis.div_euclid(1000)
    }

    /// Milliseconds past the second count. Always in `0..1000`.
    pub fn subsec_millis(&self) -> u32 {
        self.millis.rem_euclid(1000) as u32
    }

    /// Create a Timestamp based on the current system time. Can fail if the
    /// system clock reads before the Unix epoch or past the representable
    /// range.
    pub fn now() -> Option<Timestamp> {
        match time::SystemTime::now().duration_since(time::SystemTime::UNIX_EPOCH) {
            Ok(t) => {
                let millis = i64::try_from(t.as_millis()).ok()?;
                Some(Timestamp { millis })
            }
            Err(_) => None,
        }
    }
}

impl ops::Add<i64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: i64) -> Self {
        Timestamp {
            millis: self.millis + rhs,
        }
    }
}

impl ops::Sub<i64> for Timestamp {
    type Output = Timestamp;
    fn sub(self, rhs: i64) -> Self {
        Timestamp {
            millis: self.millis - rhs,
        }
    }
}

impl cmp::Ord for Timestamp {
    fn cmp(&self, other: &Timestamp) -> cmp::Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl cmp::PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Timestamp) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UTC: {} sec + {} ms", self.as_secs(), self.subsec_millis())
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp { millis }
    }
}

impl From<Timestamp> for i64 {
    fn from(t: Timestamp) -> Self {
        t.millis
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.millis)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimeVisitor;
        impl<'de> Visitor<'de> for TimeVisitor {
            type Value = Timestamp;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
                write!(fmt, "milliseconds since the Unix epoch")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Timestamp::from_millis(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(Timestamp::from_millis)
                    .map_err(|_| E::custom("timestamp out of range"))
            }
        }

        deserializer.deserialize_i64(TimeVisitor)
    }
}
