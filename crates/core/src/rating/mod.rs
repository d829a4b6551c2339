// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use crate::prelude::*;

pub type RatingRaw = u16;

/// A normalized rating in the closed interval [0, 1].
pub type RatingPercentage = f64;

/// A rating in the format-native raw representation.
///
/// The raw value never exceeds the scale maximum of the format.
/// An absent rating is represented by `None`, never by 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rating {
    raw: RatingRaw,
    max: RatingRaw,
}

impl Rating {
    /// Scale maximum of frame tags, i.e. the ID3v2 popularimeter.
    pub const FRAME_TAG_MAX: RatingRaw = 255;

    /// Scale maximum of vorbis comments and MP4 atoms.
    pub const PERCENT_MAX: RatingRaw = 100;

    /// Create a rating from a raw value, clipped to `[0, max]`.
    ///
    /// Negative raw values represent an absent rating. The scale maximum
    /// must be positive.
    #[must_use]
    pub fn from_raw(raw: i64, max: RatingRaw) -> Option<Self> {
        if raw < 0 || max == 0 {
            return None;
        }
        let raw = raw.min(max.into()) as RatingRaw;
        Some(Self { raw, max })
    }

    /// Create a rating from a normalized percentage, clipped to `[0, 1]`.
    ///
    /// NaN is treated as an absent rating.
    #[must_use]
    pub fn from_percentage(percentage: RatingPercentage, max: RatingRaw) -> Option<Self> {
        if percentage.is_nan() || max == 0 {
            return None;
        }
        let raw = (percentage.clamp(0.0, 1.0) * f64::from(max)).round() as RatingRaw;
        Some(Self { raw, max })
    }

    #[must_use]
    pub const fn raw(self) -> RatingRaw {
        self.raw
    }

    #[must_use]
    pub const fn max(self) -> RatingRaw {
        self.max
    }

    #[must_use]
    pub fn percentage(self) -> RatingPercentage {
        f64::from(self.raw) / f64::from(self.max)
    }

    /// Convert into the raw representation of a different scale.
    #[must_use]
    pub fn rescale(self, max: RatingRaw) -> Option<Self> {
        if self.max == max {
            return Some(self);
        }
        Self::from_percentage(self.percentage(), max)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum RatingInvalidity {
    RawOutOfRange,
    ZeroMax,
}

impl Validate for Rating {
    type Invalidity = RatingInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(self.max == 0, Self::Invalidity::ZeroMax)
            .invalidate_if(self.raw > self.max, Self::Invalidity::RawOutOfRange)
            .into()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.raw, self.max)
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
