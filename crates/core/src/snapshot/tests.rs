// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashSet;

use strum::IntoEnumIterator as _;

use super::*;
use crate::chapter::Chapter;

fn snapshot(uri: &str) -> SnapshotBody {
    SnapshotBody {
        uri: uri.to_owned(),
        ..Default::default()
    }
}

#[test]
fn empty_is_identity() {
    assert!(Snapshot::empty().is_empty());
    assert!(Snapshot::default().is_empty());
    // Same content, but a different instance
    assert!(!Snapshot::new(SnapshotBody::default()).is_empty());
}

#[test]
fn get_from_empty_matches_semantic_type() {
    let empty = Snapshot::empty();
    for field in Field::iter() {
        let value = empty.get(field);
        assert_eq!(field.semantic_type(), value.semantic_type(), "{field}");
        assert!(value.is_absent(), "{field}");
        assert_eq!("", value.to_string(), "{field}");
    }
}

#[test]
fn equality_by_uri() {
    let lhs = Snapshot::new(SnapshotBody {
        title: "a".to_owned(),
        ..snapshot("file:///a.mp3")
    });
    let rhs = Snapshot::new(SnapshotBody {
        title: "b".to_owned(),
        ..snapshot("file:///a.mp3")
    });
    assert_eq!(lhs, rhs);
    assert_ne!(lhs, Snapshot::new(snapshot("file:///b.mp3")));
    let set = [lhs, rhs].into_iter().collect::<HashSet<_>>();
    assert_eq!(1, set.len());
}

#[test]
fn snapshot_without_uri_differs_from_empty() {
    let no_uri = Snapshot::new(SnapshotBody::default());
    assert!(no_uri.uri().is_empty());
    assert!(!no_uri.is_empty());
    assert_ne!(Snapshot::empty(), no_uri);
    assert_ne!(no_uri, Snapshot::empty());
    assert_eq!(Snapshot::empty(), Snapshot::default());
    assert_eq!(no_uri, Snapshot::new(SnapshotBody::default()));
}

#[test]
fn computed_fields() {
    let body = SnapshotBody {
        track: Some(3),
        tracks_total: Some(12),
        disc: Some(1),
        cover: Some(Cover {
            mime_type: Some("image/png".to_owned()),
            data: Arc::from(vec![0u8; 4]),
        }),
        rating: Rating::from_raw(128, Rating::FRAME_TAG_MAX),
        ..snapshot("file:///a.mp3")
    };
    assert_eq!("3/12", body.get(Field::TrackInfo).to_string());
    assert_eq!("1", body.get(Field::DiscsInfo).to_string());
    assert_eq!("image/png 4 bytes", body.get(Field::CoverInfo).to_string());
    assert_eq!(Some(128), body.get(Field::RatingRaw).to_integer());
    let FieldValue::Percentage(Some(percentage)) = body.get(Field::Rating) else {
        panic!("unexpected value");
    };
    assert!((percentage - 128.0 / 255.0).abs() < f64::EPSILON);
}

#[test]
fn absent_integer_sentinel() {
    let body = snapshot("file:///a.mp3");
    assert_eq!(
        Some(FieldValue::ABSENT_INTEGER),
        body.get(Field::RatingRaw).to_integer()
    );
    assert_eq!(None, body.get(Field::Title).to_integer());
}

#[test]
fn list_fields() {
    let body = SnapshotBody {
        tags: vec!["rock".to_owned(), "live".to_owned()],
        chapters: Chapters::new(vec![Chapter::new(DurationMs::from_inner(5), "x")]),
        custom: [
            String::new(),
            String::new(),
            "three".to_owned(),
            String::new(),
            String::new(),
        ],
        ..snapshot("file:///a.mp3")
    };
    assert_eq!("rock, live", body.get(Field::Tags).to_string());
    assert_eq!("5-x", body.get(Field::Chapters).to_string());
    assert_eq!("three", body.get(Field::Custom3).to_string());
}
