// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_core::Field;

use super::{FieldKeys, NumberPairKeys};
use crate::handle::TagKey;

const CUSTOM_DESCRIPTIONS: [&str; 5] = ["CUSTOM1", "CUSTOM2", "CUSTOM3", "CUSTOM4", "CUSTOM5"];

fn text_key(field: Field) -> Option<TagKey> {
    let key = match field {
        Field::Title => TagKey::Id3Text("TIT2"),
        Field::Album => TagKey::Id3Text("TALB"),
        Field::Artist => TagKey::Id3Text("TPE1"),
        Field::AlbumArtist => TagKey::Id3Text("TPE2"),
        Field::Composer => TagKey::Id3Text("TCOM"),
        Field::Genre => TagKey::Id3Text("TCON"),
        Field::Category => TagKey::Id3Text("TIT1"),
        Field::Mood => TagKey::Id3Text("TMOO"),
        Field::Encoder => TagKey::Id3Text("TSSE"),
        Field::Comment => TagKey::Id3Comment,
        Field::Lyrics => TagKey::Id3Lyrics,
        _ => TagKey::Id3UserText(CUSTOM_DESCRIPTIONS[field.custom_slot()?]),
    };
    Some(key)
}

pub(super) const FIELD_KEYS: FieldKeys = FieldKeys {
    text_key,
    publisher: &[TagKey::Id3Text("TPUB")],
    rating: TagKey::Id3Popularimeter,
    play_count: Some(TagKey::Id3PlayCounter),
    year: TagKey::Id3Year,
    track: NumberPairKeys::Combined(TagKey::Id3Text("TRCK")),
    disc: NumberPairKeys::Combined(TagKey::Id3Text("TPOS")),
};
