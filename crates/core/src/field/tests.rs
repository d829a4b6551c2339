// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use strum::IntoEnumIterator as _;

use super::*;

#[test]
fn names() {
    assert_eq!("PATH", Field::Path.name());
    assert_eq!("FILESIZE", Field::FileSize.name());
    assert_eq!("SAMPLE_RATE", Field::SampleRate.name());
    assert_eq!("ALBUM_ARTIST", Field::AlbumArtist.name());
    assert_eq!("PLAYCOUNT", Field::PlayCount.name());
    assert_eq!("CUSTOM5", Field::Custom5.name());
    assert_eq!("ADDED_TO_LIBRARY", Field::AddedToLibrary.to_string());
    assert_eq!(Ok(Field::RatingRaw), "RATING_RAW".parse());
}

#[test]
fn natural_order() {
    let fields = Field::iter().collect::<Vec<_>>();
    assert_eq!(Field::COUNT, fields.len());
    assert_eq!(Some(&Field::Path), fields.first());
    assert_eq!(Some(&Field::AddedToLibrary), fields.last());
    assert!(fields.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn only_cover_is_not_string_representable() {
    assert_eq!(
        vec![Field::Cover],
        Field::iter()
            .filter(|field| !field.is_string_representable())
            .collect::<Vec<_>>()
    );
}

#[test]
fn custom_slots() {
    for slot in 0..CUSTOM_FIELD_COUNT {
        let field = Field::custom(slot).unwrap();
        assert_eq!(Some(slot), field.custom_slot());
    }
    assert!(Field::custom(CUSTOM_FIELD_COUNT).is_none());
    assert!(Field::Title.custom_slot().is_none());
}

#[test]
fn writable() {
    assert!(!Field::Path.is_writable());
    assert!(!Field::TrackInfo.is_writable());
    assert!(Field::Rating.is_writable());
    assert!(Field::Title.is_writable());
    assert!(Field::Tags.is_writable());
    assert!(Field::Custom3.is_writable());
    assert!(!Field::PLAY_COUNT_CARRIER.is_writable());
    assert!(!Field::CHAPTERS_CARRIER.is_writable());
    assert!(!Field::CUSTOM_ATTRIBUTES_CARRIER.is_writable());
}

#[test]
fn describe_all() {
    assert!(Field::iter().all(|field| !field.describe().is_empty()));
}

#[test]
fn private_fields() {
    let private = Field::iter()
        .filter(|field| field.origin() == Origin::Private)
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            Field::Color,
            Field::Tags,
            Field::Chapters,
            Field::FirstPlayed,
            Field::LastPlayed,
            Field::AddedToLibrary,
        ],
        private
    );
    assert!(Field::Chapters.is_writable());
    assert_eq!(Origin::Native, Field::CHAPTERS_CARRIER.origin());
}
