// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_core::Rating;

use super::*;

#[test]
fn container_format_capabilities() {
    assert_eq!(Some(TagFamily::FrameTag), ContainerFormat::Mpeg.tag_family());
    assert_eq!(Some(TagFamily::FrameTag), ContainerFormat::Riff.tag_family());
    assert!(ContainerFormat::Aiff.is_wrapped());
    assert!(!ContainerFormat::Mpeg.is_wrapped());
    assert_eq!(
        Some(TagFamily::VorbisComment),
        ContainerFormat::Flac.tag_family()
    );
    assert_eq!(Some(TagFamily::Atom), ContainerFormat::Mp4.tag_family());
    assert_eq!(None, ContainerFormat::Unsupported.tag_family());

    assert_eq!(
        Some(Rating::FRAME_TAG_MAX),
        ContainerFormat::Mpeg.rating_max()
    );
    assert_eq!(Some(Rating::PERCENT_MAX), ContainerFormat::Ogg.rating_max());
    assert_eq!(None, ContainerFormat::Unsupported.rating_max());

    assert!(ContainerFormat::Riff.has_native_play_counter());
    assert!(!ContainerFormat::Mp4.has_native_play_counter());
    assert!(!ContainerFormat::Unsupported.has_publisher());
}

#[test]
fn tag_key_display() {
    assert_eq!("TIT2", TagKey::Id3Text("TIT2").to_string());
    assert_eq!("TXXX:CUSTOM1", TagKey::Id3UserText("CUSTOM1").to_string());
    assert_eq!("\u{a9}nam", TagKey::Mp4Atom(*b"\xa9nam").to_string());
    assert_eq!(
        "----:com.apple.iTunes:LABEL",
        TagKey::Mp4Freeform {
            mean: "com.apple.iTunes",
            name: "LABEL"
        }
        .to_string()
    );
}

#[test]
fn memory_tag_ignores_foreign_keys() {
    let mut tag = MemoryTag::new(ContainerFormat::Flac);
    tag.set(TagKey::Vorbis("TITLE"), "Title").unwrap();
    tag.set(TagKey::Id3Text("TIT2"), "Ignored").unwrap();
    assert_eq!(Some("Title".to_owned()), tag.get(TagKey::Vorbis("TITLE")));
    assert_eq!(None, tag.get(TagKey::Id3Text("TIT2")));
    assert_eq!(1, tag.fields().len());

    tag.remove(TagKey::Vorbis("TITLE")).unwrap();
    assert_eq!(None, tag.get(TagKey::Vorbis("TITLE")));
}

#[test]
fn memory_tag_cover() {
    let mut tag = MemoryTag::new(ContainerFormat::Mpeg);
    assert!(tag.cover().is_none());
    let cover = Cover {
        mime_type: Some("image/png".to_owned()),
        data: vec![1, 2, 3].into(),
    };
    tag.set_cover(Some(&cover)).unwrap();
    assert_eq!(Some(cover), tag.cover());
    tag.set_cover(None).unwrap();
    assert!(tag.cover().is_none());
}

#[test]
fn closure_as_opener() {
    let opener = |_: &Path| -> Result<Box<dyn TagHandle>> {
        Ok(Box::new(MemoryTag::new(ContainerFormat::Mp4)))
    };
    let handle = opener.open_tag(Path::new("/tmp/a.m4a")).unwrap();
    assert_eq!(ContainerFormat::Mp4, handle.container_format());
}
