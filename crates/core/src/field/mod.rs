// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use itertools::Itertools as _;
use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{chapter, prelude::*, rating, snapshot};

/// The closed set of known metadata attributes.
///
/// The declaration order is the natural order when iterating
/// over all fields.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    Path,
    Format,
    #[strum(serialize = "FILESIZE")]
    #[cfg_attr(feature = "serde", serde(rename = "FILESIZE"))]
    FileSize,
    Bitrate,
    Encoder,
    Channels,
    SampleRate,
    Length,
    Title,
    Album,
    Artist,
    AlbumArtist,
    Composer,
    Publisher,
    Track,
    TracksTotal,
    TrackInfo,
    Disc,
    DiscsTotal,
    DiscsInfo,
    Genre,
    Year,
    Cover,
    CoverInfo,
    Rating,
    RatingRaw,
    #[strum(serialize = "PLAYCOUNT")]
    #[cfg_attr(feature = "serde", serde(rename = "PLAYCOUNT"))]
    PlayCount,
    Category,
    Comment,
    Lyrics,
    Mood,
    Color,
    Tags,
    Chapters,
    #[strum(serialize = "CUSTOM1")]
    #[cfg_attr(feature = "serde", serde(rename = "CUSTOM1"))]
    Custom1,
    #[strum(serialize = "CUSTOM2")]
    #[cfg_attr(feature = "serde", serde(rename = "CUSTOM2"))]
    Custom2,
    #[strum(serialize = "CUSTOM3")]
    #[cfg_attr(feature = "serde", serde(rename = "CUSTOM3"))]
    Custom3,
    #[strum(serialize = "CUSTOM4")]
    #[cfg_attr(feature = "serde", serde(rename = "CUSTOM4"))]
    Custom4,
    #[strum(serialize = "CUSTOM5")]
    #[cfg_attr(feature = "serde", serde(rename = "CUSTOM5"))]
    Custom5,
    FirstPlayed,
    LastPlayed,
    AddedToLibrary,
}

/// The value type of a [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SemanticType {
    String,
    Integer,
    /// Normalized to the closed interval [0, 1].
    Percentage,
    Duration,
    Color,
    /// An ordered sequence of items.
    List,
    /// Opaque binary data.
    Binary,
    Timestamp,
}

/// Where the value of a [`Field`] is stored or derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Audio properties or file system.
    Header,
    /// A native field of the tag format.
    Native,
    /// Packed into a carrier field of the tag.
    Private,
    /// Derived from other fields.
    Computed,
}

/// Slots of the generic custom fields.
pub const CUSTOM_FIELD_COUNT: usize = 5;

impl Field {
    #[must_use]
    pub const fn semantic_type(self) -> SemanticType {
        use Field::*;
        match self {
            Path | Format | Encoder | Title | Album | Artist | AlbumArtist | Composer
            | Publisher | TrackInfo | DiscsInfo | Genre | CoverInfo | Category | Comment
            | Lyrics | Mood | Custom1 | Custom2 | Custom3 | Custom4 | Custom5 => {
                SemanticType::String
            }
            FileSize | Bitrate | Channels | SampleRate | Track | TracksTotal | Disc
            | DiscsTotal | Year | RatingRaw | PlayCount => SemanticType::Integer,
            Rating => SemanticType::Percentage,
            Length => SemanticType::Duration,
            Color => SemanticType::Color,
            Tags | Chapters => SemanticType::List,
            Cover => SemanticType::Binary,
            FirstPlayed | LastPlayed | AddedToLibrary => SemanticType::Timestamp,
        }
    }

    #[must_use]
    pub const fn origin(self) -> Origin {
        use Field::*;
        match self {
            Path | Format | FileSize | Bitrate | Channels | SampleRate | Length => Origin::Header,
            TrackInfo | DiscsInfo | CoverInfo | Rating => Origin::Computed,
            Color | Tags | Chapters | FirstPlayed | LastPlayed | AddedToLibrary => {
                Origin::Private
            }
            Encoder | Title | Album | Artist | AlbumArtist | Composer | Publisher | Track
            | TracksTotal | Disc | DiscsTotal | Genre | Year | Cover | RatingRaw | PlayCount
            | Category | Comment | Lyrics | Mood | Custom1 | Custom2 | Custom3 | Custom4
            | Custom5 => Origin::Native,
        }
    }

    /// All fields except binary cover art have a textual form.
    #[must_use]
    pub const fn is_string_representable(self) -> bool {
        !matches!(self.semantic_type(), SemanticType::Binary)
    }

    /// The 0-based slot of a generic custom field.
    #[must_use]
    pub const fn custom_slot(self) -> Option<usize> {
        match self {
            Self::Custom1 => Some(0),
            Self::Custom2 => Some(1),
            Self::Custom3 => Some(2),
            Self::Custom4 => Some(3),
            Self::Custom5 => Some(4),
            _ => None,
        }
    }

    #[must_use]
    pub const fn custom(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Self::Custom1),
            1 => Some(Self::Custom2),
            2 => Some(Self::Custom3),
            3 => Some(Self::Custom4),
            4 => Some(Self::Custom5),
            _ => None,
        }
    }

    /// Custom field that carries the play count as a portable fallback.
    pub const PLAY_COUNT_CARRIER: Self = Self::Custom1;

    /// Custom field that carries the chapter list.
    pub const CHAPTERS_CARRIER: Self = Self::Custom2;

    /// Custom field that carries the packed private attributes.
    pub const CUSTOM_ATTRIBUTES_CARRIER: Self = Self::Custom5;

    #[must_use]
    pub const fn is_carrier(self) -> bool {
        matches!(
            self,
            Self::PLAY_COUNT_CARRIER | Self::CHAPTERS_CARRIER | Self::CUSTOM_ATTRIBUTES_CARRIER
        )
    }

    /// Fields that could be modified by a writer.
    ///
    /// Header and computed fields are read-only. Carrier fields
    /// are only modified indirectly through their typed fields.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        match self.origin() {
            Origin::Header => false,
            Origin::Computed => matches!(self, Self::Rating),
            Origin::Native => !self.is_carrier(),
            Origin::Private => true,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Informational text for displaying the field.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        use Field::*;
        match self {
            Path => "File path",
            Format => "Container format",
            FileSize => "File size in bytes",
            Bitrate => "Audio bitrate in kbit/s",
            Encoder => "Encoder",
            Channels => "Number of audio channels",
            SampleRate => "Sample rate in Hz",
            Length => "Duration",
            Title => "Title",
            Album => "Album",
            Artist => "Artist",
            AlbumArtist => "Album artist",
            Composer => "Composer",
            Publisher => "Publisher",
            Track => "Track number",
            TracksTotal => "Total number of tracks",
            TrackInfo => "Track number and total",
            Disc => "Disc number",
            DiscsTotal => "Total number of discs",
            DiscsInfo => "Disc number and total",
            Genre => "Genre",
            Year => "Year of recording",
            Cover => "Front cover image",
            CoverInfo => "Front cover image summary",
            Rating => "Rating",
            RatingRaw => "Rating as stored in the file",
            PlayCount => "Play count",
            Category => "Category",
            Comment => "Comment",
            Lyrics => "Lyrics",
            Mood => "Mood",
            Color => "Color",
            Tags => "Tags",
            Chapters => "Chapters",
            Custom1 => "Custom 1",
            Custom2 => "Custom 2",
            Custom3 => "Custom 3",
            Custom4 => "Custom 4",
            Custom5 => "Custom 5",
            FirstPlayed => "First played",
            LastPlayed => "Last played",
            AddedToLibrary => "Added to library",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed field value.
///
/// The variant is determined by the [`SemanticType`] of the field.
/// Absent values are represented by `None` or an empty collection,
/// never by a special in-band value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(Option<i64>),
    Percentage(Option<f64>),
    Duration(Option<DurationMs>),
    Color(Option<RgbColor>),
    Tags(Vec<String>),
    Chapters(chapter::Chapters),
    Binary(Option<snapshot::Cover>),
    Timestamp(Option<UtcDateTimeMs>),
}

impl FieldValue {
    /// Integer value of an absent integer field.
    pub const ABSENT_INTEGER: i64 = -1;

    #[must_use]
    pub const fn semantic_type(&self) -> SemanticType {
        match self {
            Self::String(_) => SemanticType::String,
            Self::Integer(_) => SemanticType::Integer,
            Self::Percentage(_) => SemanticType::Percentage,
            Self::Duration(_) => SemanticType::Duration,
            Self::Color(_) => SemanticType::Color,
            Self::Tags(_) | Self::Chapters(_) => SemanticType::List,
            Self::Binary(_) => SemanticType::Binary,
            Self::Timestamp(_) => SemanticType::Timestamp,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::String(value) => value.is_empty(),
            Self::Integer(value) => value.is_none(),
            Self::Percentage(value) => value.is_none(),
            Self::Duration(value) => value.is_none(),
            Self::Color(value) => value.is_none(),
            Self::Tags(value) => value.is_empty(),
            Self::Chapters(value) => value.is_empty(),
            Self::Binary(value) => value.is_none(),
            Self::Timestamp(value) => value.is_none(),
        }
    }

    /// The integer value or [`Self::ABSENT_INTEGER`].
    ///
    /// Returns `None` for non-integer values.
    #[must_use]
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(value.unwrap_or(Self::ABSENT_INTEGER)),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_rating(value: Option<rating::Rating>) -> Self {
        Self::Percentage(value.map(rating::Rating::percentage))
    }
}

/// The textual form.
///
/// Absent values and binary data are displayed as an empty string.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Integer(value) => value.map_or(Ok(()), |value| write!(f, "{value}")),
            Self::Percentage(value) => value.map_or(Ok(()), |value| write!(f, "{value}")),
            Self::Duration(value) => {
                value.map_or(Ok(()), |value| write!(f, "{}", value.to_inner()))
            }
            Self::Color(value) => value.map_or(Ok(()), |value| write!(f, "{value}")),
            Self::Tags(value) => f.write_str(&value.iter().join(", ")),
            Self::Chapters(value) => f.write_str(&value.lines().join("\n")),
            Self::Binary(_) => Ok(()),
            Self::Timestamp(value) => value.map_or(Ok(()), |value| write!(f, "{value}")),
        }
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
