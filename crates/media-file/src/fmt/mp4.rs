// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_core::Field;

use super::{FieldKeys, NumberPairKeys};
use crate::handle::TagKey;

const ITUNES_MEAN: &str = "com.apple.iTunes";

const fn itunes(name: &'static str) -> TagKey {
    TagKey::Mp4Freeform {
        mean: ITUNES_MEAN,
        name,
    }
}

const CUSTOM_KEYS: [TagKey; 5] = [
    itunes("CUSTOM1"),
    itunes("CUSTOM2"),
    itunes("CUSTOM3"),
    itunes("CUSTOM4"),
    itunes("CUSTOM5"),
];

fn text_key(field: Field) -> Option<TagKey> {
    let key = match field {
        Field::Title => TagKey::Mp4Atom(*b"\xa9nam"),
        Field::Album => TagKey::Mp4Atom(*b"\xa9alb"),
        Field::Artist => TagKey::Mp4Atom(*b"\xa9ART"),
        Field::AlbumArtist => TagKey::Mp4Atom(*b"aART"),
        Field::Composer => TagKey::Mp4Atom(*b"\xa9wrt"),
        Field::Genre => TagKey::Mp4Atom(*b"\xa9gen"),
        Field::Category => TagKey::Mp4Atom(*b"\xa9grp"),
        Field::Mood => itunes("MOOD"),
        Field::Encoder => TagKey::Mp4Atom(*b"\xa9too"),
        Field::Comment => TagKey::Mp4Atom(*b"\xa9cmt"),
        Field::Lyrics => TagKey::Mp4Atom(*b"\xa9lyr"),
        _ => CUSTOM_KEYS[field.custom_slot()?],
    };
    Some(key)
}

pub(super) const FIELD_KEYS: FieldKeys = FieldKeys {
    text_key,
    // Different players use different names
    publisher: &[itunes("LABEL"), itunes("PUBLISHER")],
    rating: TagKey::Mp4Atom(*b"rate"),
    play_count: None,
    year: TagKey::Mp4Atom(*b"\xa9day"),
    track: NumberPairKeys::Separate {
        number: TagKey::Mp4TrackNumber,
        total: TagKey::Mp4TrackTotal,
    },
    disc: NumberPairKeys::Separate {
        number: TagKey::Mp4DiscNumber,
        total: TagKey::Mp4DiscTotal,
    },
};
