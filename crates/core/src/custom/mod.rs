// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Packed encoding of application-private attributes.
//!
//! All private attributes of an item are stored in a single text field
//! of the tag, the _carrier_. The packed region consists of segments that
//! are enclosed by [`GROUP_SEPARATOR`]:
//!
//! ```text
//! <GS><token><RS><value><GS><token><RS><value><GS>
//! ```
//!
//! Each segment starts with the token of a [`CustomKey`] that is terminated
//! by [`KEY_TERMINATOR`]. Text that precedes the first or follows the last
//! group separator is preserved verbatim.
//!
//! Segments without a key terminator are still recognized when reading,
//! i.e. `<token><value>`, by matching the longest token that prefixes the
//! segment. They are rewritten with a terminator on the next update.

use std::{borrow::Cow, ops::Range};

use strum::{EnumIter, IntoEnumIterator as _, IntoStaticStr};

use crate::prelude::*;

/// Delimits the segments of the packed region.
pub const GROUP_SEPARATOR: char = '\u{1D}';

/// Terminates the key token of a segment.
pub const KEY_TERMINATOR: char = '\u{1E}';

/// Delimits items within a single value, e.g. tags or chapters.
pub const UNIT_SEPARATOR: char = '\u{1F}';

const RESERVED_CHARS: [char; 3] = [GROUP_SEPARATOR, KEY_TERMINATOR, UNIT_SEPARATOR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
pub enum CustomKey {
    #[strum(serialize = "COLOR")]
    Color,
    #[strum(serialize = "TAGS")]
    Tags,
    #[strum(serialize = "PLAYED_FIRST")]
    PlayedFirst,
    #[strum(serialize = "PLAYED_LAST")]
    PlayedLast,
    #[strum(serialize = "LIB_ADDED")]
    LibAdded,
}

impl CustomKey {
    /// The fixed token that starts each segment of this key.
    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// Find the key of a segment and return its value.
    fn match_segment(segment: &str) -> Option<(Self, &str)> {
        // Tagged segments
        if let Some((token, value)) = segment.split_once(KEY_TERMINATOR) {
            let key = Self::iter().find(|key| key.token() == token)?;
            return Some((key, value));
        }
        // Legacy segments
        Self::iter()
            .filter(|key| segment.starts_with(key.token()))
            .max_by_key(|key| key.token().len())
            .map(|key| (key, &segment[key.token().len()..]))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("value contains reserved character {0:?}")]
    ReservedCharacter(char),
}

/// Values may contain unit separators, but no other reserved characters.
fn find_reserved_char(value: &str) -> Option<char> {
    value
        .chars()
        .find(|c| *c == GROUP_SEPARATOR || *c == KEY_TERMINATOR)
}

/// Split the carrier text into the preserved prefix, the packed region,
/// and the preserved suffix.
fn split_packed(text: &str) -> (&str, Range<usize>, &str) {
    let (Some(first), Some(last)) = (text.find(GROUP_SEPARATOR), text.rfind(GROUP_SEPARATOR))
    else {
        return (text, 0..0, "");
    };
    let sep_len = GROUP_SEPARATOR.len_utf8();
    let region = (first + sep_len)..last.max(first + sep_len);
    (&text[..first], region, &text[last + sep_len..])
}

fn segments(text: &str) -> impl Iterator<Item = &str> {
    let (_, region, _) = split_packed(text);
    text[region]
        .split(GROUP_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}

/// Look up the value of `key`.
///
/// Returns the value of the first matching segment.
#[must_use]
pub fn decode(packed: &str, key: CustomKey) -> Option<&str> {
    segments(packed).find_map(|segment| {
        CustomKey::match_segment(segment)
            .and_then(|(segment_key, value)| (segment_key == key).then_some(value))
    })
}

#[must_use]
pub fn has_key(packed: &str, key: CustomKey) -> bool {
    decode(packed, key).is_some()
}

/// Replace the value of `key`.
///
/// All existing segments of `key` are removed. An empty value is
/// represented by the absence of the key. All other segments are
/// preserved in their original order. If no segment remains then only
/// the text surrounding the packed region is returned.
pub fn encode(packed: &str, key: CustomKey, value: &str) -> Result<String, CodecError> {
    if let Some(reserved) = find_reserved_char(value) {
        return Err(CodecError::ReservedCharacter(reserved));
    }
    let (prefix, region, suffix) = split_packed(packed);
    let mut retained = packed[region]
        .split(GROUP_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .filter(|segment| {
            CustomKey::match_segment(segment).is_none_or(|(segment_key, _)| segment_key != key)
        })
        .map(Cow::Borrowed)
        .collect::<Vec<_>>();
    if !value.is_empty() {
        retained.push(Cow::Owned(format!(
            "{token}{KEY_TERMINATOR}{value}",
            token = key.token()
        )));
    }
    let mut encoded = String::with_capacity(packed.len() + value.len() + 16);
    encoded.push_str(prefix);
    if !retained.is_empty() {
        encoded.push(GROUP_SEPARATOR);
        for segment in retained {
            encoded.push_str(&segment);
            encoded.push(GROUP_SEPARATOR);
        }
    }
    encoded.push_str(suffix);
    Ok(encoded)
}

/// Encode a set of tags as a single value.
///
/// Each tag is prefixed by [`UNIT_SEPARATOR`]. Tags are trimmed and
/// reserved characters are removed. Empty and duplicate tags are skipped.
/// An empty set of tags is encoded as an empty string.
#[must_use]
pub fn encode_tags<I, S>(tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut encoded = String::new();
    let mut seen = Vec::<String>::new();
    for tag in tags {
        let tag = tag.as_ref().replace(RESERVED_CHARS, "");
        let tag = tag.trim();
        if tag.is_empty() || seen.iter().any(|seen| seen == tag) {
            continue;
        }
        encoded.push(UNIT_SEPARATOR);
        encoded.push_str(tag);
        seen.push(tag.to_owned());
    }
    encoded
}

#[must_use]
pub fn decode_tags(encoded: &str) -> Vec<String> {
    encoded
        .split(UNIT_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// The decoded private attributes of an item.
///
/// Values that could not be parsed are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomAttributes {
    pub color: Option<RgbColor>,
    pub tags: Vec<String>,
    pub played_first: Option<UtcDateTimeMs>,
    pub played_last: Option<UtcDateTimeMs>,
    pub lib_added: Option<UtcDateTimeMs>,
}

impl CustomAttributes {
    #[must_use]
    pub fn decode(packed: &str) -> Self {
        let timestamp = |key| {
            decode(packed, key)
                .and_then(|value| value.parse::<UtcDateTimeMs>().ok())
                .filter(IsValid::is_valid)
        };
        Self {
            color: decode(packed, CustomKey::Color)
                .and_then(|value| value.parse::<RgbColor>().ok())
                .filter(IsValid::is_valid),
            tags: decode(packed, CustomKey::Tags)
                .map(decode_tags)
                .unwrap_or_default(),
            played_first: timestamp(CustomKey::PlayedFirst),
            played_last: timestamp(CustomKey::PlayedLast),
            lib_added: timestamp(CustomKey::LibAdded),
        }
    }

    /// Encode the textual form of a single attribute.
    #[must_use]
    pub fn encode_value(&self, key: CustomKey) -> String {
        let timestamp = |value: Option<UtcDateTimeMs>| {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        };
        match key {
            CustomKey::Color => self
                .color
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            CustomKey::Tags => encode_tags(&self.tags),
            CustomKey::PlayedFirst => timestamp(self.played_first),
            CustomKey::PlayedLast => timestamp(self.played_last),
            CustomKey::LibAdded => timestamp(self.lib_added),
        }
    }

    /// Update all attributes within the carrier text.
    ///
    /// Unrelated content of the carrier is preserved.
    pub fn encode_into(&self, packed: &str) -> Result<String, CodecError> {
        CustomKey::iter().try_fold(packed.to_owned(), |packed, key| {
            encode(&packed, key, &self.encode_value(key))
        })
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
