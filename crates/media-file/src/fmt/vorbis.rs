// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_core::Field;

use super::{FieldKeys, NumberPairKeys};
use crate::handle::TagKey;

const CUSTOM_KEYS: [&str; 5] = ["CUSTOM1", "CUSTOM2", "CUSTOM3", "CUSTOM4", "CUSTOM5"];

fn text_key(field: Field) -> Option<TagKey> {
    let key = match field {
        Field::Title => "TITLE",
        Field::Album => "ALBUM",
        Field::Artist => "ARTIST",
        Field::AlbumArtist => "ALBUMARTIST",
        Field::Composer => "COMPOSER",
        Field::Genre => "GENRE",
        Field::Category => "GROUPING",
        Field::Mood => "MOOD",
        Field::Encoder => "ENCODER",
        Field::Comment => "COMMENT",
        Field::Lyrics => "LYRICS",
        _ => CUSTOM_KEYS[field.custom_slot()?],
    };
    Some(TagKey::Vorbis(key))
}

pub(super) const FIELD_KEYS: FieldKeys = FieldKeys {
    text_key,
    publisher: &[TagKey::Vorbis("PUBLISHER")],
    rating: TagKey::Vorbis("RATING"),
    play_count: None,
    year: TagKey::Vorbis("DATE"),
    track: NumberPairKeys::Separate {
        number: TagKey::Vorbis("TRACKNUMBER"),
        total: TagKey::Vorbis("TRACKTOTAL"),
    },
    disc: NumberPairKeys::Separate {
        number: TagKey::Vorbis("DISCNUMBER"),
        total: TagKey::Vorbis("DISCTOTAL"),
    },
};
