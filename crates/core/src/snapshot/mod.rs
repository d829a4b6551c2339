// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    sync::{Arc, LazyLock},
};

use crate::{
    chapter::Chapters,
    field::{CUSTOM_FIELD_COUNT, Field, FieldValue},
    prelude::*,
    rating::Rating,
};

/// Embedded artwork.
#[derive(Clone, PartialEq, Eq)]
pub struct Cover {
    pub mime_type: Option<String>,
    pub data: Arc<[u8]>,
}

impl Cover {
    /// Summary for displaying, e.g. `image/jpeg 1234 bytes`.
    #[must_use]
    pub fn info(&self) -> String {
        let Self { mime_type, data } = self;
        let bytes = data.len();
        match mime_type {
            Some(mime_type) => format!("{mime_type} {bytes} bytes"),
            None => format!("{bytes} bytes"),
        }
    }
}

impl fmt::Debug for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cover")
            .field("mime_type", &self.mime_type)
            .field("data.len()", &self.data.len())
            .finish()
    }
}

/// The decoded attributes of a [`Snapshot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotBody {
    /// Canonical URI of the file, i.e. the identity.
    pub uri: String,

    pub path: String,
    pub format: String,
    pub file_size: Option<u64>,
    /// kbit/s
    pub bitrate: Option<u32>,
    pub encoder: String,
    pub channels: Option<u8>,
    /// Hz
    pub sample_rate: Option<u32>,
    pub length: Option<DurationMs>,

    pub title: String,
    pub album: String,
    pub artist: String,
    pub album_artist: String,
    pub composer: String,
    pub publisher: String,
    pub track: Option<u32>,
    pub tracks_total: Option<u32>,
    pub disc: Option<u32>,
    pub discs_total: Option<u32>,
    pub genre: String,
    pub year: Option<i32>,
    pub cover: Option<Cover>,
    pub rating: Option<Rating>,
    pub play_count: Option<u64>,
    pub category: String,
    pub comment: String,
    pub lyrics: String,
    pub mood: String,
    pub chapters: Chapters,
    pub custom: [String; CUSTOM_FIELD_COUNT],

    pub color: Option<RgbColor>,
    pub tags: Vec<String>,
    pub first_played: Option<UtcDateTimeMs>,
    pub last_played: Option<UtcDateTimeMs>,
    pub added_to_library: Option<UtcDateTimeMs>,
}

fn number_info(number: Option<u32>, total: Option<u32>) -> String {
    match (number, total) {
        (Some(number), Some(total)) => format!("{number}/{total}"),
        (Some(number), None) => number.to_string(),
        (None, _) => String::new(),
    }
}

impl SnapshotBody {
    /// Track number and total, e.g. `3/12`.
    #[must_use]
    pub fn track_info(&self) -> String {
        number_info(self.track, self.tracks_total)
    }

    /// Disc number and total, e.g. `1/2`.
    #[must_use]
    pub fn discs_info(&self) -> String {
        number_info(self.disc, self.discs_total)
    }

    #[must_use]
    pub fn cover_info(&self) -> String {
        self.cover.as_ref().map(Cover::info).unwrap_or_default()
    }

    /// Uniform, typed access to all fields.
    #[must_use]
    pub fn get(&self, field: Field) -> FieldValue {
        let string = |value: &String| FieldValue::String(value.clone());
        let integer = |value: Option<i64>| FieldValue::Integer(value);
        match field {
            Field::Path => string(&self.path),
            Field::Format => string(&self.format),
            Field::FileSize => integer(self.file_size.and_then(|size| i64::try_from(size).ok())),
            Field::Bitrate => integer(self.bitrate.map(i64::from)),
            Field::Encoder => string(&self.encoder),
            Field::Channels => integer(self.channels.map(i64::from)),
            Field::SampleRate => integer(self.sample_rate.map(i64::from)),
            Field::Length => FieldValue::Duration(self.length),
            Field::Title => string(&self.title),
            Field::Album => string(&self.album),
            Field::Artist => string(&self.artist),
            Field::AlbumArtist => string(&self.album_artist),
            Field::Composer => string(&self.composer),
            Field::Publisher => string(&self.publisher),
            Field::Track => integer(self.track.map(i64::from)),
            Field::TracksTotal => integer(self.tracks_total.map(i64::from)),
            Field::TrackInfo => FieldValue::String(self.track_info()),
            Field::Disc => integer(self.disc.map(i64::from)),
            Field::DiscsTotal => integer(self.discs_total.map(i64::from)),
            Field::DiscsInfo => FieldValue::String(self.discs_info()),
            Field::Genre => string(&self.genre),
            Field::Year => integer(self.year.map(i64::from)),
            Field::Cover => FieldValue::Binary(self.cover.clone()),
            Field::CoverInfo => FieldValue::String(self.cover_info()),
            Field::Rating => FieldValue::from_rating(self.rating),
            Field::RatingRaw => integer(self.rating.map(|rating| rating.raw().into())),
            Field::PlayCount => {
                integer(self.play_count.and_then(|count| i64::try_from(count).ok()))
            }
            Field::Category => string(&self.category),
            Field::Comment => string(&self.comment),
            Field::Lyrics => string(&self.lyrics),
            Field::Mood => string(&self.mood),
            Field::Color => FieldValue::Color(self.color),
            Field::Tags => FieldValue::Tags(self.tags.clone()),
            Field::Chapters => FieldValue::Chapters(self.chapters.clone()),
            Field::Custom1
            | Field::Custom2
            | Field::Custom3
            | Field::Custom4
            | Field::Custom5 => {
                let slot = field.custom_slot().unwrap_or_default();
                string(&self.custom[slot])
            }
            Field::FirstPlayed => FieldValue::Timestamp(self.first_played),
            Field::LastPlayed => FieldValue::Timestamp(self.last_played),
            Field::AddedToLibrary => FieldValue::Timestamp(self.added_to_library),
        }
    }
}

static EMPTY: LazyLock<Snapshot> = LazyLock::new(|| Snapshot(Arc::new(SnapshotBody::default())));

/// An immutable, fully decoded view of the metadata of a single file.
///
/// Cloning is cheap and shares the body. Snapshots are identified and
/// compared by their URI.
#[derive(Clone)]
pub struct Snapshot(Arc<SnapshotBody>);

impl Snapshot {
    /// Wraps a body into a new, shared snapshot.
    ///
    /// A body without a URI is accepted but can neither be stored nor
    /// identified. It never equals [`Snapshot::empty()`].
    #[must_use]
    pub fn new(body: SnapshotBody) -> Self {
        Self(Arc::new(body))
    }

    /// The shared instance that represents "no metadata".
    ///
    /// Returned for unreadable files. Must never be stored.
    #[must_use]
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Checks for the shared [`Snapshot::empty()`] instance by identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Arc::ptr_eq(&self.0, &EMPTY.0)
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.0.uri
    }

    #[must_use]
    pub fn body(&self) -> &SnapshotBody {
        &self.0
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Snapshot {
    type Target = SnapshotBody;

    fn deref(&self) -> &Self::Target {
        self.body()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Snapshot(EMPTY)");
        }
        f.debug_tuple("Snapshot").field(&self.0).finish()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() && other.is_empty();
        }
        self.uri() == other.uri()
    }
}

impl Eq for Snapshot {}

impl Hash for Snapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri().hash(state);
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
