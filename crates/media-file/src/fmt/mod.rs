// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Routing of fields to the native representation of each container format.

use std::fmt;

use semval::prelude::IsValid as _;

use tagmux_core::{
    Chapters, Cover, CustomAttributes, CustomKey, DurationMs, Field, Rating, RgbColor,
    SnapshotBody, UtcDateTimeMs, custom,
    field::{CUSTOM_FIELD_COUNT, SemanticType},
    rating::RatingRaw,
    util::string::trimmed_non_empty_from,
};

use crate::{
    Error, Result,
    handle::{ContainerFormat, TagFamily, TagHandle, TagKey},
};

mod id3v2;
mod mp4;
mod vorbis;

/// Native keys of a number and its total, e.g. track number and
/// number of tracks.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NumberPairKeys {
    /// Both values in a single field as `n/m`.
    Combined(TagKey),
    Separate {
        number: TagKey,
        total: TagKey,
    },
}

/// Mapping of fields to native keys for a single tag family.
#[derive(Debug)]
pub(crate) struct FieldKeys {
    /// Plain text fields, including all custom fields.
    pub(crate) text_key: fn(Field) -> Option<TagKey>,
    /// All aliases are written, the first non-empty alias is read.
    pub(crate) publisher: &'static [TagKey],
    pub(crate) rating: TagKey,
    pub(crate) play_count: Option<TagKey>,
    pub(crate) year: TagKey,
    pub(crate) track: NumberPairKeys,
    pub(crate) disc: NumberPairKeys,
}

impl FieldKeys {
    fn carrier(&self, field: Field) -> Result<TagKey> {
        debug_assert!(field.is_carrier());
        (self.text_key)(field).ok_or_else(|| anyhow::anyhow!("no carrier for {field}").into())
    }

    fn number_pair(&self, field: Field) -> Option<NumberPairKeys> {
        match field {
            Field::Track | Field::TracksTotal => Some(self.track),
            Field::Disc | Field::DiscsTotal => Some(self.disc),
            _ => None,
        }
    }
}

#[must_use]
pub(crate) const fn field_keys(family: TagFamily) -> &'static FieldKeys {
    match family {
        TagFamily::FrameTag => &id3v2::FIELD_KEYS,
        TagFamily::VorbisComment => &vorbis::FIELD_KEYS,
        TagFamily::Atom => &mp4::FIELD_KEYS,
    }
}

const fn custom_key(field: Field) -> Option<CustomKey> {
    let key = match field {
        Field::Color => CustomKey::Color,
        Field::Tags => CustomKey::Tags,
        Field::FirstPlayed => CustomKey::PlayedFirst,
        Field::LastPlayed => CustomKey::PlayedLast,
        Field::AddedToLibrary => CustomKey::LibAdded,
        _ => return None,
    };
    Some(key)
}

fn parse_number(input: &str) -> Option<u32> {
    input.trim().parse().ok().filter(|number| *number > 0)
}

/// Parse `n`, `n/m`, or `/m`.
fn parse_number_pair(input: &str) -> (Option<u32>, Option<u32>) {
    match input.split_once('/') {
        Some((number, total)) => (parse_number(number), parse_number(total)),
        None => (parse_number(input), None),
    }
}

fn format_number_pair(number: Option<u32>, total: Option<u32>) -> String {
    match (number, total) {
        (Some(number), Some(total)) => format!("{number}/{total}"),
        (Some(number), None) => number.to_string(),
        (None, Some(total)) => format!("0/{total}"),
        (None, None) => String::new(),
    }
}

/// Extract the year from a date, e.g. `2023` or `2023-10-01`.
fn parse_year(input: &str) -> Option<i32> {
    let input = input.trim();
    let digits = input
        .char_indices()
        .find(|(index, c)| !(c.is_ascii_digit() || (*index == 0 && *c == '-')))
        .map_or(input.len(), |(index, _)| index);
    input[..digits].parse().ok()
}

/// Parse a native rating value.
///
/// Some applications store fractional values in the range [0, 1].
fn parse_rating(input: &str, max: RatingRaw) -> Option<Rating> {
    let input = input.trim();
    if let Ok(raw) = input.parse::<i64>() {
        return Rating::from_raw(raw, max);
    }
    let value = input.parse::<f64>().ok()?;
    if (0.0..=1.0).contains(&value) {
        Rating::from_percentage(value, max)
    } else {
        Rating::from_raw(value.round() as i64, max)
    }
}

fn read_text(handle: &dyn TagHandle, key: TagKey) -> Option<String> {
    handle
        .get(key)
        .and_then(|value| trimmed_non_empty_from(&value))
}

fn write_text(handle: &mut dyn TagHandle, key: TagKey, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        handle.remove(key)
    } else {
        handle.set(key, value)
    }
}

/// Typed read access to the fields of a tag.
#[derive(Clone, Copy)]
pub struct TagReader<'a> {
    handle: &'a dyn TagHandle,
    format: ContainerFormat,
    keys: Option<&'static FieldKeys>,
}

impl fmt::Debug for TagReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagReader")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl<'a> TagReader<'a> {
    #[must_use]
    pub fn new(handle: &'a dyn TagHandle) -> Self {
        let format = handle.container_format();
        Self {
            handle,
            format,
            keys: format.tag_family().map(field_keys),
        }
    }

    #[must_use]
    pub const fn container_format(&self) -> ContainerFormat {
        self.format
    }

    /// Read a plain text field.
    ///
    /// Returns `None` for all fields that are not stored as plain text.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<String> {
        let keys = self.keys?;
        if field == Field::Publisher {
            if !self.format.has_publisher() {
                return None;
            }
            return keys
                .publisher
                .iter()
                .find_map(|key| read_text(self.handle, *key));
        }
        read_text(self.handle, (keys.text_key)(field)?)
    }

    /// Read a number and its total.
    #[must_use]
    pub fn number_pair(&self, field: Field) -> (Option<u32>, Option<u32>) {
        let Some(pair) = self.keys.and_then(|keys| keys.number_pair(field)) else {
            return (None, None);
        };
        match pair {
            NumberPairKeys::Combined(key) => read_text(self.handle, key)
                .as_deref()
                .map(parse_number_pair)
                .unwrap_or_default(),
            NumberPairKeys::Separate { number, total } => {
                // The number field might also contain the total
                let (number, total_of_number) = read_text(self.handle, number)
                    .as_deref()
                    .map(parse_number_pair)
                    .unwrap_or_default();
                let total = read_text(self.handle, total)
                    .as_deref()
                    .and_then(parse_number)
                    .or(total_of_number);
                (number, total)
            }
        }
    }

    #[must_use]
    pub fn year(&self) -> Option<i32> {
        let keys = self.keys?;
        read_text(self.handle, keys.year)
            .as_deref()
            .and_then(parse_year)
    }

    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        let keys = self.keys?;
        let max = self.format.rating_max()?;
        read_text(self.handle, keys.rating)
            .as_deref()
            .and_then(|value| parse_rating(value, max))
    }

    /// Read the play count.
    ///
    /// The native play counter takes precedence over the carrier field.
    #[must_use]
    pub fn play_count(&self) -> Option<u64> {
        let keys = self.keys?;
        let native = keys
            .play_count
            .filter(|_| self.format.has_native_play_counter())
            .and_then(|key| read_text(self.handle, key));
        native
            .or_else(|| self.text(Field::PLAY_COUNT_CARRIER))
            .and_then(|value| value.trim().parse().ok())
    }

    #[must_use]
    pub fn chapters(&self) -> Chapters {
        self.text(Field::CHAPTERS_CARRIER)
            .as_deref()
            .map(Chapters::decode)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn custom_attributes(&self) -> CustomAttributes {
        self.text(Field::CUSTOM_ATTRIBUTES_CARRIER)
            .as_deref()
            .map(CustomAttributes::decode)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn cover(&self) -> Option<Cover> {
        self.keys.and_then(|_| self.handle.cover())
    }

    /// Decode all header and tag fields.
    ///
    /// The identity of the file (URI, path, size) is left empty.
    #[must_use]
    pub fn read_body(&self, with_cover: bool) -> SnapshotBody {
        let properties = self.handle.properties();
        let text = |field| self.text(field).unwrap_or_default();
        let (track, tracks_total) = self.number_pair(Field::Track);
        let (disc, discs_total) = self.number_pair(Field::Disc);
        let CustomAttributes {
            color,
            tags,
            played_first,
            played_last,
            lib_added,
        } = self.custom_attributes();
        let custom = std::array::from_fn::<_, CUSTOM_FIELD_COUNT, _>(|slot| {
            Field::custom(slot).map(text).unwrap_or_default()
        });
        SnapshotBody {
            format: self.format.name().to_owned(),
            bitrate: properties.bitrate,
            channels: properties.channels,
            sample_rate: properties.sample_rate,
            length: properties.duration.map(DurationMs::from),
            encoder: text(Field::Encoder),
            title: text(Field::Title),
            album: text(Field::Album),
            artist: text(Field::Artist),
            album_artist: text(Field::AlbumArtist),
            composer: text(Field::Composer),
            publisher: text(Field::Publisher),
            track,
            tracks_total,
            disc,
            discs_total,
            genre: text(Field::Genre),
            year: self.year(),
            cover: if with_cover { self.cover() } else { None },
            rating: self.rating(),
            play_count: self.play_count(),
            category: text(Field::Category),
            comment: text(Field::Comment),
            lyrics: text(Field::Lyrics),
            mood: text(Field::Mood),
            chapters: self.chapters(),
            custom,
            color,
            tags,
            first_played: played_first,
            last_played: played_last,
            added_to_library: lib_added,
            ..Default::default()
        }
    }
}

/// A write session on a single tag.
///
/// Field-level failures are logged and skipped. Only successful
/// writes are counted as changes.
#[derive(Debug)]
pub struct TagEditor {
    handle: Box<dyn TagHandle>,
    changed_count: usize,
}

impl TagEditor {
    #[must_use]
    pub fn new(handle: Box<dyn TagHandle>) -> Self {
        Self {
            handle,
            changed_count: 0,
        }
    }

    #[must_use]
    pub fn container_format(&self) -> ContainerFormat {
        self.handle.container_format()
    }

    #[must_use]
    pub fn reader(&self) -> TagReader<'_> {
        TagReader::new(self.handle.as_ref())
    }

    /// The number of successful field writes.
    #[must_use]
    pub const fn changed_count(&self) -> usize {
        self.changed_count
    }

    /// Write all changes back into the file.
    ///
    /// The change counter is reset on success.
    pub fn persist(&mut self) -> Result<()> {
        self.handle.persist()?;
        self.changed_count = 0;
        Ok(())
    }

    #[must_use]
    pub fn into_handle(self) -> Box<dyn TagHandle> {
        self.handle
    }

    fn apply<F>(&mut self, field: Field, write: F) -> bool
    where
        F: FnOnce(&mut dyn TagHandle, &'static FieldKeys) -> Result<()>,
    {
        let format = self.handle.container_format();
        let Some(keys) = format.tag_family().map(field_keys) else {
            log::debug!("Ignoring {field} for unsupported container format");
            return false;
        };
        match write(self.handle.as_mut(), keys) {
            Ok(()) => {
                self.changed_count += 1;
                true
            }
            Err(err) => {
                log::warn!("Failed to write {field} into {format}: {err}");
                false
            }
        }
    }

    fn has_rating(&self) -> bool {
        self.container_format()
            .tag_family()
            .map(field_keys)
            .is_some_and(|keys| self.handle.get(keys.rating).is_some())
    }

    fn reject(field: Field, err: &Error) -> bool {
        log::warn!("Failed to write {field}: {err}");
        false
    }

    /// Replace or delete a plain text field.
    ///
    /// Empty values delete the field. Carrier fields are rejected.
    pub fn set_text(&mut self, field: Field, value: &str) -> bool {
        if field.is_carrier() {
            let format = self.container_format();
            return Self::reject(field, &Error::UnsupportedField { field, format });
        }
        self.apply(field, |handle, keys| {
            let format = handle.container_format();
            if field == Field::Publisher {
                if !format.has_publisher() {
                    return Err(Error::UnsupportedField { field, format });
                }
                for key in keys.publisher {
                    write_text(handle, *key, value)?;
                }
                return Ok(());
            }
            let key = (keys.text_key)(field).ok_or(Error::UnsupportedField { field, format })?;
            write_text(handle, key, value)
        })
    }

    /// Replace either the number or the total of the track or disc.
    ///
    /// The other value of the pair is preserved.
    pub fn set_number(&mut self, field: Field, value: Option<u32>) -> bool {
        let value = value.filter(|value| *value > 0);
        let (old_number, old_total) = self.reader().number_pair(field);
        let is_total = matches!(field, Field::TracksTotal | Field::DiscsTotal);
        self.apply(field, |handle, keys| {
            let format = handle.container_format();
            let pair = keys
                .number_pair(field)
                .ok_or(Error::UnsupportedField { field, format })?;
            let value_text = value.map(|value| value.to_string()).unwrap_or_default();
            match pair {
                NumberPairKeys::Combined(key) => {
                    let (number, total) = if is_total {
                        (old_number, value)
                    } else {
                        (value, old_total)
                    };
                    write_text(handle, key, &format_number_pair(number, total))
                }
                NumberPairKeys::Separate { number, total } => {
                    if is_total {
                        write_text(handle, total, &value_text)
                    } else {
                        write_text(handle, number, &value_text)
                    }
                }
            }
        })
    }

    pub fn set_year(&mut self, year: Option<i32>) -> bool {
        self.apply(Field::Year, |handle, keys| {
            let value = year.map(|year| year.to_string()).unwrap_or_default();
            write_text(handle, keys.year, &value)
        })
    }

    /// Set the rating from a percentage in the range [0, 1].
    ///
    /// Values outside of this range are clipped. `None` deletes the rating.
    pub fn set_rating(&mut self, percentage: Option<f64>) -> bool {
        let format = self.container_format();
        let Some(max) = format.rating_max() else {
            log::debug!("Ignoring {field} for unsupported container format", field = Field::Rating);
            return false;
        };
        let raw = match percentage {
            Some(percentage) => match Rating::from_percentage(percentage, max) {
                Some(rating) => rating.raw().into(),
                None => {
                    return Self::reject(
                        Field::Rating,
                        &Error::invalid_value(Field::Rating, format!("{percentage}")),
                    );
                }
            },
            None => -1,
        };
        self.write_rating_raw(Field::Rating, raw)
    }

    /// Set the native rating value.
    ///
    /// Values are clipped to the native scale. Negative values
    /// delete the rating.
    pub fn set_rating_raw(&mut self, raw: i64) -> bool {
        self.write_rating_raw(Field::RatingRaw, raw)
    }

    fn write_rating_raw(&mut self, field: Field, raw: i64) -> bool {
        if raw < 0 && !self.has_rating() {
            log::debug!("No {field} to delete");
            return false;
        }
        self.apply(field, |handle, keys| {
            let format = handle.container_format();
            let max = format
                .rating_max()
                .ok_or(Error::UnsupportedField { field, format })?;
            match Rating::from_raw(raw, max) {
                Some(rating) => handle.set(keys.rating, &rating.raw().to_string()),
                None => handle.remove(keys.rating),
            }
        })
    }

    /// Write the play count into the carrier and the native counter.
    pub fn set_play_count(&mut self, play_count: Option<u64>) -> bool {
        self.apply(Field::PlayCount, |handle, keys| {
            let value = play_count.map(|count| count.to_string()).unwrap_or_default();
            write_text(handle, keys.carrier(Field::PLAY_COUNT_CARRIER)?, &value)?;
            if let Some(key) = keys
                .play_count
                .filter(|_| handle.container_format().has_native_play_counter())
            {
                write_text(handle, key, &value)?;
            }
            Ok(())
        })
    }

    pub fn set_chapters(&mut self, chapters: &Chapters) -> bool {
        self.apply(Field::Chapters, |handle, keys| {
            write_text(
                handle,
                keys.carrier(Field::CHAPTERS_CARRIER)?,
                &chapters.encode(),
            )
        })
    }

    fn set_custom_attribute(&mut self, field: Field, value: &str) -> bool {
        let Some(custom_key) = custom_key(field) else {
            let format = self.container_format();
            return Self::reject(field, &Error::UnsupportedField { field, format });
        };
        self.apply(field, |handle, keys| {
            let carrier = keys.carrier(Field::CUSTOM_ATTRIBUTES_CARRIER)?;
            let packed = handle.get(carrier).unwrap_or_default();
            let packed = custom::encode(&packed, custom_key, value)
                .map_err(|err| Error::invalid_value(field, err.to_string()))?;
            write_text(handle, carrier, &packed)
        })
    }

    pub fn set_color(&mut self, color: Option<RgbColor>) -> bool {
        if let Some(color) = color
            && !color.is_valid()
        {
            return Self::reject(
                Field::Color,
                &Error::invalid_value(Field::Color, color.to_string()),
            );
        }
        let value = color.map(|color| color.to_string()).unwrap_or_default();
        self.set_custom_attribute(Field::Color, &value)
    }

    pub fn set_tags<I, S>(&mut self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_custom_attribute(Field::Tags, &custom::encode_tags(tags))
    }

    /// Set one of the timestamps [`Field::FirstPlayed`],
    /// [`Field::LastPlayed`], or [`Field::AddedToLibrary`].
    pub fn set_timestamp(&mut self, field: Field, timestamp: Option<UtcDateTimeMs>) -> bool {
        if field.semantic_type() != SemanticType::Timestamp {
            let format = self.container_format();
            return Self::reject(field, &Error::UnsupportedField { field, format });
        }
        if let Some(timestamp) = timestamp
            && !timestamp.is_valid()
        {
            return Self::reject(field, &Error::invalid_value(field, timestamp.to_string()));
        }
        let value = timestamp
            .map(|timestamp| timestamp.to_string())
            .unwrap_or_default();
        self.set_custom_attribute(field, &value)
    }

    pub fn set_cover(&mut self, cover: Option<&Cover>) -> bool {
        self.apply(Field::Cover, |handle, _| handle.set_cover(cover))
    }

    /// Set a field from its textual form.
    ///
    /// An empty or blank value deletes the field.
    pub fn set_field(&mut self, field: Field, value: &str) -> bool {
        if !field.is_writable() || !field.is_string_representable() {
            let format = self.container_format();
            return Self::reject(field, &Error::UnsupportedField { field, format });
        }
        match parse_field_value(field, value) {
            Ok(value) => self.set_parsed(field, value),
            Err(err) => Self::reject(field, &err),
        }
    }

    fn set_parsed(&mut self, field: Field, value: ParsedValue) -> bool {
        match value {
            ParsedValue::Text(text) => self.set_text(field, &text),
            ParsedValue::Number(number) => self.set_number(field, number),
            ParsedValue::Year(year) => self.set_year(year),
            ParsedValue::RatingRaw(raw) => self.set_rating_raw(raw),
            ParsedValue::Rating(percentage) => self.set_rating(percentage),
            ParsedValue::PlayCount(play_count) => self.set_play_count(play_count),
            ParsedValue::Color(color) => self.set_color(color),
            ParsedValue::Tags(tags) => self.set_tags(tags),
            ParsedValue::Chapters(chapters) => self.set_chapters(&chapters),
            ParsedValue::Timestamp(timestamp) => self.set_timestamp(field, timestamp),
        }
    }
}

enum ParsedValue {
    Text(String),
    Number(Option<u32>),
    Year(Option<i32>),
    RatingRaw(i64),
    Rating(Option<f64>),
    PlayCount(Option<u64>),
    Color(Option<RgbColor>),
    Tags(Vec<String>),
    Chapters(Chapters),
    Timestamp(Option<UtcDateTimeMs>),
}

fn parse_field_value(field: Field, input: &str) -> Result<ParsedValue> {
    fn parse_optional<T>(field: Field, input: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        input
            .parse()
            .map(Some)
            .map_err(|err| Error::invalid_value(field, format!("\"{input}\": {err}")))
    }
    let parsed = match field {
        Field::Track | Field::TracksTotal | Field::Disc | Field::DiscsTotal => {
            ParsedValue::Number(parse_optional(field, input)?)
        }
        Field::Year => ParsedValue::Year(parse_optional(field, input)?),
        Field::RatingRaw => ParsedValue::RatingRaw(parse_optional(field, input)?.unwrap_or(-1)),
        Field::Rating => ParsedValue::Rating(parse_optional(field, input)?),
        Field::PlayCount => ParsedValue::PlayCount(parse_optional(field, input)?),
        Field::Color => ParsedValue::Color(parse_optional(field, input)?),
        Field::Tags => ParsedValue::Tags(
            input
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        ),
        Field::Chapters => ParsedValue::Chapters(Chapters::decode_lines(input)),
        Field::FirstPlayed | Field::LastPlayed | Field::AddedToLibrary => {
            ParsedValue::Timestamp(parse_optional(field, input)?)
        }
        _ => ParsedValue::Text(input.to_owned()),
    };
    Ok(parsed)
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
