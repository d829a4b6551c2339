// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Access to the native tag of an opened audio file.

use std::{collections::BTreeMap, fmt, path::Path, time::Duration};

use tagmux_core::{Cover, rating::RatingRaw};

use crate::Result;

pub mod file;

/// The representation of the native tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    /// ID3v2 frames
    FrameTag,
    /// Vorbis comments
    VorbisComment,
    /// MP4 item list atoms
    Atom,
}

/// The detected container format of an audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerFormat {
    /// MPEG audio with an ID3v2 tag.
    Mpeg,
    /// RIFF/WAVE with an embedded ID3v2 tag.
    Riff,
    /// AIFF with an embedded ID3v2 tag.
    Aiff,
    /// FLAC with vorbis comments.
    Flac,
    /// Ogg Vorbis or Opus with vorbis comments.
    Ogg,
    /// MPEG-4 with atoms.
    Mp4,
    /// Any other format. All tag operations are no-ops.
    Unsupported,
}

impl ContainerFormat {
    #[must_use]
    pub const fn tag_family(self) -> Option<TagFamily> {
        match self {
            Self::Mpeg | Self::Riff | Self::Aiff => Some(TagFamily::FrameTag),
            Self::Flac | Self::Ogg => Some(TagFamily::VorbisComment),
            Self::Mp4 => Some(TagFamily::Atom),
            Self::Unsupported => None,
        }
    }

    /// Whether the native frame tag is wrapped into a chunk of the container.
    #[must_use]
    pub const fn is_wrapped(self) -> bool {
        matches!(self, Self::Riff | Self::Aiff)
    }

    /// The maximum of the native rating scale.
    #[must_use]
    pub const fn rating_max(self) -> Option<RatingRaw> {
        match self.tag_family() {
            Some(TagFamily::FrameTag) => Some(tagmux_core::Rating::FRAME_TAG_MAX),
            Some(TagFamily::VorbisComment | TagFamily::Atom) => {
                Some(tagmux_core::Rating::PERCENT_MAX)
            }
            None => None,
        }
    }

    #[must_use]
    pub const fn has_native_play_counter(self) -> bool {
        matches!(self.tag_family(), Some(TagFamily::FrameTag))
    }

    #[must_use]
    pub const fn has_publisher(self) -> bool {
        self.tag_family().is_some()
    }

    /// Short name for displaying, e.g. in the FORMAT field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mpeg => "MP3",
            Self::Riff => "WAV",
            Self::Aiff => "AIFF",
            Self::Flac => "FLAC",
            Self::Ogg => "OGG",
            Self::Mp4 => "MP4",
            Self::Unsupported => "",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a single native field of a tag.
///
/// All values are exchanged as text. Numeric fields use the
/// decimal representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKey {
    /// ID3v2 text information frame, e.g. `TIT2`.
    Id3Text(&'static str),
    /// ID3v2 recording time `TDRC`, as year.
    Id3Year,
    /// ID3v2 user defined text frame `TXXX` with the given description.
    Id3UserText(&'static str),
    /// ID3v2 comment frame `COMM` without description.
    Id3Comment,
    /// ID3v2 unsynchronized lyrics frame `USLT`.
    Id3Lyrics,
    /// ID3v2 popularimeter frame `POPM`, the rating byte.
    Id3Popularimeter,
    /// ID3v2 play counter frame `PCNT`.
    Id3PlayCounter,
    /// Vorbis comment, e.g. `TITLE`.
    Vorbis(&'static str),
    /// MP4 atom with a FOURCC identifier, e.g. `©nam`.
    Mp4Atom([u8; 4]),
    /// MP4 freeform atom `----`.
    Mp4Freeform {
        mean: &'static str,
        name: &'static str,
    },
    /// MP4 `trkn` number.
    Mp4TrackNumber,
    /// MP4 `trkn` total.
    Mp4TrackTotal,
    /// MP4 `disk` number.
    Mp4DiscNumber,
    /// MP4 `disk` total.
    Mp4DiscTotal,
}

impl TagKey {
    #[must_use]
    pub const fn tag_family(self) -> TagFamily {
        match self {
            Self::Id3Text(_)
            | Self::Id3Year
            | Self::Id3UserText(_)
            | Self::Id3Comment
            | Self::Id3Lyrics
            | Self::Id3Popularimeter
            | Self::Id3PlayCounter => TagFamily::FrameTag,
            Self::Vorbis(_) => TagFamily::VorbisComment,
            Self::Mp4Atom(_)
            | Self::Mp4Freeform { .. }
            | Self::Mp4TrackNumber
            | Self::Mp4TrackTotal
            | Self::Mp4DiscNumber
            | Self::Mp4DiscTotal => TagFamily::Atom,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id3Text(id) => f.write_str(id),
            Self::Id3Year => f.write_str("TDRC"),
            Self::Id3UserText(description) => write!(f, "TXXX:{description}"),
            Self::Id3Comment => f.write_str("COMM"),
            Self::Id3Lyrics => f.write_str("USLT"),
            Self::Id3Popularimeter => f.write_str("POPM"),
            Self::Id3PlayCounter => f.write_str("PCNT"),
            Self::Vorbis(key) => f.write_str(key),
            Self::Mp4Atom(fourcc) => {
                // ISO 8859-1
                f.write_str(&fourcc.iter().copied().map(char::from).collect::<String>())
            }
            Self::Mp4Freeform { mean, name } => write!(f, "----:{mean}:{name}"),
            Self::Mp4TrackNumber | Self::Mp4TrackTotal => f.write_str("trkn"),
            Self::Mp4DiscNumber | Self::Mp4DiscTotal => f.write_str("disk"),
        }
    }
}

/// Audio properties from the header of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioProperties {
    pub duration: Option<Duration>,
    /// kbit/s
    pub bitrate: Option<u32>,
    /// Hz
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
}

/// An opened audio file with its native tag.
///
/// Modifications are only applied to the file by [`TagHandle::persist()`].
pub trait TagHandle: fmt::Debug + Send {
    fn container_format(&self) -> ContainerFormat;

    fn properties(&self) -> AudioProperties;

    /// Read the value of a field.
    ///
    /// Returns `None` if the field is missing. Keys of a different tag
    /// family are always missing.
    fn get(&self, key: TagKey) -> Option<String>;

    /// Replace the value of a field.
    fn set(&mut self, key: TagKey, value: &str) -> Result<()>;

    /// Delete a field.
    fn remove(&mut self, key: TagKey) -> Result<()>;

    /// The front cover.
    fn cover(&self) -> Option<Cover>;

    /// Replace or delete the front cover.
    fn set_cover(&mut self, cover: Option<&Cover>) -> Result<()>;

    /// Write the tag back into the file.
    fn persist(&mut self) -> Result<()>;
}

/// Opens files for accessing their tags.
pub trait OpenTag {
    fn open_tag(&self, path: &Path) -> Result<Box<dyn TagHandle>>;
}

impl<F> OpenTag for F
where
    F: Fn(&Path) -> Result<Box<dyn TagHandle>>,
{
    fn open_tag(&self, path: &Path) -> Result<Box<dyn TagHandle>> {
        self(path)
    }
}

/// A tag that only lives in memory.
///
/// Absorbs all modifications while in degraded mode. Also useful
/// for testing.
#[derive(Debug, Clone)]
pub struct MemoryTag {
    format: ContainerFormat,
    properties: AudioProperties,
    fields: BTreeMap<TagKey, String>,
    cover: Option<Cover>,
}

impl MemoryTag {
    #[must_use]
    pub fn new(format: ContainerFormat) -> Self {
        Self {
            format,
            properties: Default::default(),
            fields: Default::default(),
            cover: None,
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: AudioProperties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: TagKey, value: impl Into<String>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<TagKey, String> {
        &self.fields
    }

    fn accepts(&self, key: TagKey) -> bool {
        self.format.tag_family() == Some(key.tag_family())
    }
}

impl TagHandle for MemoryTag {
    fn container_format(&self) -> ContainerFormat {
        self.format
    }

    fn properties(&self) -> AudioProperties {
        self.properties.clone()
    }

    fn get(&self, key: TagKey) -> Option<String> {
        if !self.accepts(key) {
            return None;
        }
        self.fields.get(&key).cloned()
    }

    fn set(&mut self, key: TagKey, value: &str) -> Result<()> {
        if self.accepts(key) {
            self.fields.insert(key, value.to_owned());
        }
        Ok(())
    }

    fn remove(&mut self, key: TagKey) -> Result<()> {
        self.fields.remove(&key);
        Ok(())
    }

    fn cover(&self) -> Option<Cover> {
        self.cover.clone()
    }

    fn set_cover(&mut self, cover: Option<&Cover>) -> Result<()> {
        self.cover = cover.cloned();
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
