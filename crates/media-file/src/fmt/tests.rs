// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

use tagmux_core::{Chapter, custom::UNIT_SEPARATOR};

use super::*;
use crate::handle::{AudioProperties, MemoryTag};

fn editor(tag: MemoryTag) -> TagEditor {
    TagEditor::new(Box::new(tag))
}

fn field_value(editor: &TagEditor, key: TagKey) -> Option<String> {
    editor.reader().handle.get(key)
}

#[test]
fn parse_number_pairs() {
    assert_eq!((Some(3), Some(12)), parse_number_pair("3/12"));
    assert_eq!((Some(3), None), parse_number_pair(" 3 "));
    assert_eq!((None, Some(12)), parse_number_pair("/12"));
    assert_eq!((None, Some(12)), parse_number_pair("0/12"));
    assert_eq!((None, None), parse_number_pair("x"));
}

#[test]
fn parse_years() {
    assert_eq!(Some(2023), parse_year("2023"));
    assert_eq!(Some(2023), parse_year("2023-10-01"));
    assert_eq!(Some(1999), parse_year(" 1999-01-01T12:00:00 "));
    assert_eq!(None, parse_year(""));
    assert_eq!(None, parse_year("unknown"));
}

#[test]
fn parse_ratings() {
    assert_eq!(Some(128), parse_rating("128", 255).map(Rating::raw));
    assert_eq!(Some(255), parse_rating("300", 255).map(Rating::raw));
    assert_eq!(Some(80), parse_rating("0.8", 100).map(Rating::raw));
    assert_eq!(None, parse_rating("-1", 255));
    assert_eq!(None, parse_rating("five", 100));
}

#[test]
fn rating_percentage_on_frame_tag() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mpeg));
    assert!(editor.set_rating(Some(0.5)));
    assert_eq!(
        Some("128"),
        field_value(&editor, TagKey::Id3Popularimeter).as_deref()
    );
    let rating = editor.reader().rating().unwrap();
    assert_eq!(128, rating.raw());
    assert!((rating.percentage() - 0.5).abs() <= 1.0 / 255.0);
}

#[test]
fn rating_percentage_is_clipped() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Flac));
    assert!(editor.set_rating(Some(1.5)));
    assert_eq!(Some(100), editor.reader().rating().map(Rating::raw));
    assert!(editor.set_rating(Some(-0.5)));
    assert_eq!(Some(0), editor.reader().rating().map(Rating::raw));
}

#[test]
fn negative_raw_rating_deletes_the_field() {
    let mut editor = editor(
        MemoryTag::new(ContainerFormat::Mp4).with_field(TagKey::Mp4Atom(*b"rate"), "60"),
    );
    assert_eq!(Some(60), editor.reader().rating().map(Rating::raw));
    assert!(editor.set_rating_raw(-1));
    assert_eq!(None, field_value(&editor, TagKey::Mp4Atom(*b"rate")));
    assert!(editor.reader().rating().is_none());
    assert!(editor.set_field(Field::RatingRaw, "300"));
    assert_eq!(Some(100), editor.reader().rating().map(Rating::raw));
    assert!(editor.set_field(Field::RatingRaw, ""));
    assert!(editor.reader().rating().is_none());
}

#[test]
fn deleting_absent_rating_is_no_change() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mpeg));
    assert!(!editor.set_rating_raw(-1));
    assert!(!editor.set_rating(None));
    assert_eq!(0, editor.changed_count());
    assert!(editor.set_rating_raw(10));
    assert!(editor.set_rating(None));
    assert_eq!(2, editor.changed_count());
    assert!(editor.reader().rating().is_none());
}

#[test]
fn publisher_writes_all_aliases() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mp4));
    assert!(editor.set_text(Field::Publisher, "Acme"));
    for key in mp4::FIELD_KEYS.publisher {
        assert_eq!(Some("Acme"), field_value(&editor, *key).as_deref());
    }
    assert_eq!(
        Some("Acme"),
        editor.reader().text(Field::Publisher).as_deref()
    );
    assert!(editor.set_text(Field::Publisher, ""));
    for key in mp4::FIELD_KEYS.publisher {
        assert_eq!(None, field_value(&editor, *key));
    }
}

#[test]
fn publisher_is_read_from_any_alias() {
    let tag = MemoryTag::new(ContainerFormat::Mp4).with_field(
        TagKey::Mp4Freeform {
            mean: "com.apple.iTunes",
            name: "PUBLISHER",
        },
        "Acme",
    );
    let editor = editor(tag);
    assert_eq!(
        Some("Acme"),
        editor.reader().text(Field::Publisher).as_deref()
    );
}

#[test]
fn play_count_with_native_counter() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mpeg));
    assert!(editor.set_play_count(Some(7)));
    assert_eq!(
        Some("7"),
        field_value(&editor, TagKey::Id3PlayCounter).as_deref()
    );
    assert_eq!(
        Some("7"),
        field_value(&editor, TagKey::Id3UserText("CUSTOM1")).as_deref()
    );
    assert_eq!(Some(7), editor.reader().play_count());
}

#[test]
fn play_count_prefers_native_counter() {
    let tag = MemoryTag::new(ContainerFormat::Riff)
        .with_field(TagKey::Id3PlayCounter, "42")
        .with_field(TagKey::Id3UserText("CUSTOM1"), "3");
    assert_eq!(Some(42), editor(tag).reader().play_count());
    let tag = MemoryTag::new(ContainerFormat::Riff).with_field(TagKey::Id3UserText("CUSTOM1"), "3");
    assert_eq!(Some(3), editor(tag).reader().play_count());
}

#[test]
fn play_count_without_native_counter() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Ogg));
    assert!(editor.set_play_count(Some(1)));
    assert_eq!(
        Some("1"),
        field_value(&editor, TagKey::Vorbis("CUSTOM1")).as_deref()
    );
    assert_eq!(Some(1), editor.reader().play_count());
    assert!(editor.set_play_count(None));
    assert_eq!(None, editor.reader().play_count());
}

#[test]
fn tags_and_color_share_the_carrier() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Flac));
    assert!(editor.set_tags(["rock", "live"]));
    let packed = field_value(&editor, TagKey::Vorbis("CUSTOM5")).unwrap_or_default();
    let tags = custom::decode(&packed, CustomKey::Tags).unwrap().to_owned();
    assert!(tags.starts_with(UNIT_SEPARATOR));
    assert_eq!(format!("{UNIT_SEPARATOR}rock{UNIT_SEPARATOR}live"), tags);

    assert!(editor.set_color(Some(RgbColor::RED)));
    let packed = field_value(&editor, TagKey::Vorbis("CUSTOM5")).unwrap_or_default();
    assert_eq!(Some(tags.as_str()), custom::decode(&packed, CustomKey::Tags));
    assert_eq!(Some("#FF0000"), custom::decode(&packed, CustomKey::Color));

    let attributes = editor.reader().custom_attributes();
    assert_eq!(Some(RgbColor::RED), attributes.color);
    assert_eq!(vec!["rock".to_owned(), "live".to_owned()], attributes.tags);
}

#[test]
fn removing_all_custom_attributes_deletes_the_carrier() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mpeg));
    assert!(editor.set_color(Some(RgbColor::BLUE)));
    assert!(editor.set_color(None));
    assert_eq!(None, field_value(&editor, TagKey::Id3UserText("CUSTOM5")));
}

#[test]
fn custom_carrier_preserves_foreign_text() {
    let tag = MemoryTag::new(ContainerFormat::Flac).with_field(TagKey::Vorbis("CUSTOM5"), "note");
    let mut editor = editor(tag);
    let played = UtcDateTimeMs::from_unix_timestamp_millis(1_700_000_000_000);
    assert!(editor.set_timestamp(Field::LastPlayed, Some(played)));
    let packed = field_value(&editor, TagKey::Vorbis("CUSTOM5")).unwrap();
    assert!(packed.starts_with("note"));
    assert_eq!(Some(played), editor.reader().custom_attributes().played_last);
}

#[test]
fn timestamp_setter_rejects_other_fields() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Flac));
    assert!(!editor.set_timestamp(Field::Title, None));
    assert_eq!(0, editor.changed_count());
}

#[test]
fn chapters_use_a_separate_carrier() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mp4));
    let chapters = Chapters::new(vec![
        Chapter::new(DurationMs::from_inner(60_000), "Verse"),
        Chapter::new(DurationMs::from_inner(0), "Intro"),
    ]);
    assert!(editor.set_chapters(&chapters));
    assert_eq!(chapters, editor.reader().chapters());
    assert_eq!(CustomAttributes::default(), editor.reader().custom_attributes());
    assert!(editor.set_chapters(&Chapters::default()));
    assert!(editor.reader().chapters().is_empty());
}

#[test]
fn combined_track_number_preserves_total() {
    let tag = MemoryTag::new(ContainerFormat::Mpeg).with_field(TagKey::Id3Text("TRCK"), "3/12");
    let mut editor = editor(tag);
    assert!(editor.set_number(Field::Track, Some(4)));
    assert_eq!(
        Some("4/12"),
        field_value(&editor, TagKey::Id3Text("TRCK")).as_deref()
    );
    assert!(editor.set_number(Field::TracksTotal, None));
    assert_eq!(
        Some("4"),
        field_value(&editor, TagKey::Id3Text("TRCK")).as_deref()
    );
    assert!(editor.set_number(Field::Track, None));
    assert_eq!(None, field_value(&editor, TagKey::Id3Text("TRCK")));
}

#[test]
fn separate_disc_numbers() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Flac));
    assert!(editor.set_field(Field::Disc, "1"));
    assert!(editor.set_field(Field::DiscsTotal, "2"));
    assert_eq!((Some(1), Some(2)), editor.reader().number_pair(Field::Disc));
    let tag =
        MemoryTag::new(ContainerFormat::Flac).with_field(TagKey::Vorbis("TRACKNUMBER"), "5/9");
    assert_eq!(
        (Some(5), Some(9)),
        TagEditor::new(Box::new(tag)).reader().number_pair(Field::Track)
    );
}

#[test]
fn invalid_values_do_not_abort_sibling_writes() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mpeg));
    assert!(editor.set_field(Field::Title, "Song"));
    assert!(!editor.set_field(Field::Year, "nineteen"));
    assert!(!editor.set_field(Field::Color, "not a color"));
    assert!(editor.set_field(Field::Year, "1999"));
    assert_eq!(2, editor.changed_count());
    assert_eq!(Some(1999), editor.reader().year());
    assert_eq!(Some("Song"), editor.reader().text(Field::Title).as_deref());
}

#[test]
fn read_only_and_carrier_fields_are_rejected() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Mpeg));
    assert!(!editor.set_field(Field::Bitrate, "320"));
    assert!(!editor.set_field(Field::TrackInfo, "1/2"));
    assert!(!editor.set_field(Field::Custom5, "x"));
    assert!(!editor.set_text(Field::Custom1, "x"));
    assert!(editor.set_field(Field::Custom3, "x"));
    assert_eq!(1, editor.changed_count());
}

#[test]
fn unsupported_container_is_a_no_op() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Unsupported));
    assert!(!editor.set_text(Field::Title, "Song"));
    assert!(!editor.set_rating(Some(1.0)));
    assert!(!editor.set_play_count(Some(1)));
    assert!(!editor.set_tags(["a"]));
    assert_eq!(0, editor.changed_count());
    assert_eq!(None, editor.reader().text(Field::Title));
}

#[test]
fn persist_resets_the_change_counter() {
    let mut editor = editor(MemoryTag::new(ContainerFormat::Aiff));
    assert!(editor.set_field(Field::Genre, "Jazz"));
    assert_eq!(1, editor.changed_count());
    editor.persist().unwrap();
    assert_eq!(0, editor.changed_count());
}

#[test]
fn read_body_from_tag() {
    let properties = AudioProperties {
        duration: Some(Duration::from_millis(185_250)),
        bitrate: Some(320),
        sample_rate: Some(44_100),
        channels: Some(2),
    };
    let tag = MemoryTag::new(ContainerFormat::Mpeg)
        .with_properties(properties)
        .with_field(TagKey::Id3Text("TIT2"), " Title ")
        .with_field(TagKey::Id3Text("TPE1"), "Artist")
        .with_field(TagKey::Id3Text("TPUB"), "Label")
        .with_field(TagKey::Id3Text("TRCK"), "3/12")
        .with_field(TagKey::Id3Year, "2001")
        .with_field(TagKey::Id3Popularimeter, "255")
        .with_field(TagKey::Id3UserText("CUSTOM3"), "free")
        .with_field(TagKey::Id3Text("TSSE"), "LAME");
    let editor = editor(tag);
    let body = editor.reader().read_body(true);
    assert_eq!("MP3", body.format);
    assert_eq!(Some(320), body.bitrate);
    assert_eq!(Some(DurationMs::from_inner(185_250)), body.length);
    assert_eq!("Title", body.title);
    assert_eq!("Artist", body.artist);
    assert_eq!("Label", body.publisher);
    assert_eq!("LAME", body.encoder);
    assert_eq!("3/12", body.track_info());
    assert_eq!(Some(2001), body.year);
    assert_eq!(Some(1.0), body.rating.map(Rating::percentage));
    assert_eq!(None, body.play_count);
    assert_eq!("free", body.custom[2]);
    assert!(body.custom[4].is_empty());
    assert!(body.cover.is_none());
    assert!(body.uri.is_empty());
}

#[test]
fn read_body_skips_cover_on_request() {
    let mut tag = MemoryTag::new(ContainerFormat::Flac);
    let cover = Cover {
        mime_type: Some("image/png".to_owned()),
        data: vec![1, 2, 3].into(),
    };
    tag.set_cover(Some(&cover)).unwrap();
    let editor = editor(tag);
    assert_eq!(Some(cover), editor.reader().read_body(true).cover);
    assert_eq!(None, editor.reader().read_body(false).cover);
}
