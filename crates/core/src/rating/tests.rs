// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn from_percentage_rounds_to_raw() {
    let rating = Rating::from_percentage(0.5, Rating::FRAME_TAG_MAX).unwrap();
    assert_eq!(128, rating.raw());
    assert!((rating.percentage() - 0.5).abs() <= 1.0 / 255.0);

    let rating = Rating::from_percentage(0.5, Rating::PERCENT_MAX).unwrap();
    assert_eq!(50, rating.raw());
    assert!((rating.percentage() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn from_percentage_clips_input() {
    assert_eq!(
        255,
        Rating::from_percentage(1.5, Rating::FRAME_TAG_MAX)
            .unwrap()
            .raw()
    );
    assert_eq!(
        0,
        Rating::from_percentage(-0.5, Rating::FRAME_TAG_MAX)
            .unwrap()
            .raw()
    );
    assert!(Rating::from_percentage(f64::NAN, Rating::FRAME_TAG_MAX).is_none());
}

#[test]
fn from_raw_clips_and_treats_negative_as_absent() {
    assert!(Rating::from_raw(-1, Rating::PERCENT_MAX).is_none());
    assert_eq!(
        100,
        Rating::from_raw(300, Rating::PERCENT_MAX).unwrap().raw()
    );
    assert_eq!(0, Rating::from_raw(0, Rating::PERCENT_MAX).unwrap().raw());
    assert!(Rating::from_raw(1, 0).is_none());
}

#[test]
fn rescale() {
    let rating = Rating::from_raw(100, Rating::PERCENT_MAX).unwrap();
    assert_eq!(
        255,
        rating.rescale(Rating::FRAME_TAG_MAX).unwrap().raw()
    );
    let rating = Rating::from_raw(128, Rating::FRAME_TAG_MAX).unwrap();
    assert_eq!(50, rating.rescale(Rating::PERCENT_MAX).unwrap().raw());
}

#[test]
fn validate() {
    assert!(Rating::from_raw(42, Rating::PERCENT_MAX).unwrap().is_valid());
}
