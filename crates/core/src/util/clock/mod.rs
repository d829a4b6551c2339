// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, num::ParseIntError, str::FromStr, time::Duration};

use jiff::Timestamp;
use semval::prelude::*;

///////////////////////////////////////////////////////////////////////
// UtcDateTimeMs
///////////////////////////////////////////////////////////////////////

pub type TimestampMillis = i64;

/// An _UTC_ timestamp with truncated millisecond precision.
///
/// The textual representation is the decimal number of milliseconds
/// since the Unix epoch. This is the format used for storing timestamps
/// in the private attribute record of a file.
#[derive(Clone, Debug, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTimeMs {
    unix_timestamp_millis: TimestampMillis,
}

impl UtcDateTimeMs {
    #[must_use]
    pub const fn from_unix_timestamp_millis(unix_timestamp_millis: TimestampMillis) -> Self {
        Self {
            unix_timestamp_millis,
        }
    }

    #[must_use]
    pub const fn unix_timestamp_millis(&self) -> TimestampMillis {
        self.unix_timestamp_millis
    }

    #[must_use]
    pub fn from_timestamp(timestamp: &Timestamp) -> Self {
        Self::from_unix_timestamp_millis(timestamp.as_millisecond())
    }

    /// Convert into a [`Timestamp`].
    ///
    /// Returns `None` if the value exceeds the range supported by [`Timestamp`].
    #[must_use]
    pub fn to_timestamp(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.unix_timestamp_millis).ok()
    }

    #[must_use]
    pub fn now() -> Self {
        Self::from_unix_timestamp_millis(Timestamp::now().as_millisecond())
    }
}

impl From<Timestamp> for UtcDateTimeMs {
    fn from(from: Timestamp) -> Self {
        Self::from_timestamp(&from)
    }
}

impl fmt::Display for UtcDateTimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unix_timestamp_millis)
    }
}

impl FromStr for UtcDateTimeMs {
    type Err = ParseIntError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input
            .trim()
            .parse()
            .map(Self::from_unix_timestamp_millis)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum UtcDateTimeMsInvalidity {
    OutOfRange,
}

impl Validate for UtcDateTimeMs {
    type Invalidity = UtcDateTimeMsInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.to_timestamp().is_none(),
                Self::Invalidity::OutOfRange,
            )
            .into()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UtcDateTimeMs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.unix_timestamp_millis)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UtcDateTimeMs {
    fn deserialize<D>(deserializer: D) -> Result<UtcDateTimeMs, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        TimestampMillis::deserialize(deserializer).map(Self::from_unix_timestamp_millis)
    }
}

///////////////////////////////////////////////////////////////////////
// DurationMs
///////////////////////////////////////////////////////////////////////

pub type DurationInMilliseconds = u64;

/// A non-negative duration or position with millisecond precision.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DurationMs(DurationInMilliseconds);

impl DurationMs {
    #[must_use]
    pub const fn unit_of_measure() -> &'static str {
        "ms"
    }

    #[must_use]
    pub const fn from_inner(inner: DurationInMilliseconds) -> Self {
        Self(inner)
    }

    #[must_use]
    pub const fn to_inner(self) -> DurationInMilliseconds {
        let Self(inner) = self;
        inner
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Duration> for DurationMs {
    fn from(duration: Duration) -> Self {
        Self(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

impl From<DurationMs> for Duration {
    fn from(from: DurationMs) -> Self {
        Duration::from_millis(from.0)
    }
}

impl fmt::Display for DurationMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_inner(), Self::unit_of_measure())
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
