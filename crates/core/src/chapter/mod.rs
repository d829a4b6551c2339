// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr};

use crate::{custom::UNIT_SEPARATOR, prelude::*};

const POSITION_DELIMITER: char = '-';

/// A chapter marker.
///
/// The textual form is `<position-ms>-<text>`, e.g. `90000-Intro`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    pub position: DurationMs,
    pub text: String,
}

impl Chapter {
    /// Create a new chapter.
    ///
    /// Line breaks and unit separators are replaced by spaces and the
    /// text is trimmed.
    #[must_use]
    pub fn new(position: DurationMs, text: impl AsRef<str>) -> Self {
        let text = text
            .as_ref()
            .replace([UNIT_SEPARATOR, '\n', '\r'], " ")
            .trim()
            .to_owned();
        Self { position, text }
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { position, text } = self;
        write!(f, "{}{POSITION_DELIMITER}{text}", position.to_inner())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChapterParseError {
    #[error("missing position delimiter")]
    MissingDelimiter,

    #[error("invalid position")]
    InvalidPosition,
}

impl FromStr for Chapter {
    type Err = ChapterParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (position, text) = input
            .split_once(POSITION_DELIMITER)
            .ok_or(ChapterParseError::MissingDelimiter)?;
        let position = position.trim();
        // Fractional milliseconds are rounded
        let millis = if let Ok(millis) = position.parse::<u64>() {
            millis
        } else {
            let millis = position
                .parse::<f64>()
                .map_err(|_| ChapterParseError::InvalidPosition)?;
            if !millis.is_finite() || millis < 0.0 {
                return Err(ChapterParseError::InvalidPosition);
            }
            millis.round() as u64
        };
        Ok(Self::new(DurationMs::from_inner(millis), text))
    }
}

/// Chapters ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapters(Vec<Chapter>);

impl Chapters {
    #[must_use]
    pub fn new(mut chapters: Vec<Chapter>) -> Self {
        chapters.sort_by_key(|chapter| chapter.position);
        Self(chapters)
    }

    /// Decode chapters from a carrier field.
    ///
    /// Malformed segments are skipped.
    #[must_use]
    pub fn decode(encoded: &str) -> Self {
        Self::new(
            encoded
                .split(UNIT_SEPARATOR)
                .filter(|segment| !segment.trim().is_empty())
                .filter_map(|segment| segment.parse().ok())
                .collect(),
        )
    }

    /// Decode one chapter per line.
    #[must_use]
    pub fn decode_lines(lines: &str) -> Self {
        Self::new(
            lines
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| line.parse().ok())
                .collect(),
        )
    }

    /// Encode all chapters as a single value for a carrier field.
    ///
    /// An empty list is encoded as an empty string.
    #[must_use]
    pub fn encode(&self) -> String {
        self.lines().collect::<Vec<_>>().join(&UNIT_SEPARATOR.to_string())
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.0.iter().map(ToString::to_string)
    }

    /// Merge with another list of chapters.
    ///
    /// The result is sorted by position. Chapters with the same
    /// position and text are only kept once.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let Self(mut chapters) = self;
        chapters.extend(other.0);
        chapters.sort_by(|lhs, rhs| {
            lhs.position
                .cmp(&rhs.position)
                .then_with(|| lhs.text.cmp(&rhs.text))
        });
        chapters.dedup_by(|next, prev| next.position == prev.position && next.text == prev.text);
        Self(chapters)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Chapter> {
        self.0
    }
}

impl FromIterator<Chapter> for Chapters {
    fn from_iter<T: IntoIterator<Item = Chapter>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
