// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_media_file::{
    handle::{ContainerFormat, MemoryTag, TagHandle as _, TagKey},
    io::{
        export::{WriteConfig, WriterState},
        import::ReadConfig,
    },
    playback::NoPlayback,
};

use super::*;
use crate::testing::Library;

const TPUB: TagKey = TagKey::Id3Text("TPUB");

fn mpeg() -> MemoryTag {
    MemoryTag::new(ContainerFormat::Mpeg)
}

#[test]
fn skip_missing_file() {
    let library = Library::new();
    let a = library.add_file("a.mp3", mpeg());
    let missing = library.missing_file("missing.mp3");
    let c = library.add_file("c.mp3", mpeg());
    let mut writer = Writer::new(library.opener(), NoPlayback, WriteConfig::default());
    let reader = Reader::new(library.opener(), ReadConfig::default());

    let outcome = write_batch(
        &mut writer,
        [&a, &missing, &c],
        &mut |writer| {
            writer.set_publisher("Acme");
        },
        Some(&reader),
        &AtomicBool::new(false),
    );
    assert_eq!(Completion::Finished, outcome.completion);
    assert_eq!(
        Summary {
            committed: 2,
            unchanged: 0,
            failed: 1,
        },
        outcome.summary
    );
    assert_eq!(Some("Acme"), library.tag(&a).get(TPUB).as_deref());
    assert_eq!(Some("Acme"), library.tag(&c).get(TPUB).as_deref());
    assert_eq!(2, outcome.snapshots.len());
    assert!(
        outcome
            .snapshots
            .iter()
            .all(|snapshot| snapshot.publisher == "Acme")
    );
    assert_eq!(WriterState::Idle, writer.state());
}

#[test]
fn count_unchanged_files() {
    let library = Library::new();
    let a = library.add_file("a.mp3", mpeg());
    let b = library.add_file("b.mp3", mpeg().with_field(TPUB, "Acme"));
    let mut writer = Writer::new(library.opener(), NoPlayback, WriteConfig::default());

    let outcome = write_batch(
        &mut writer,
        [&a, &b],
        &mut |writer| {
            writer.increment_playcount();
        },
        None::<&Reader>,
        &AtomicBool::new(false),
    );
    assert_eq!(2, outcome.summary.committed);
    assert!(outcome.snapshots.is_empty());

    let outcome = write_batch(
        &mut writer,
        [&a, &b],
        &mut |_| {},
        None::<&Reader>,
        &AtomicBool::new(false),
    );
    assert_eq!(
        Summary {
            committed: 0,
            unchanged: 2,
            failed: 0,
        },
        outcome.summary
    );
    assert_eq!(
        Some("1"),
        library.tag(&b).get(TagKey::Id3PlayCounter).as_deref()
    );
}

#[test]
fn abort_before_next_file() {
    let library = Library::new();
    let a = library.add_file("a.mp3", mpeg());
    let b = library.add_file("b.mp3", mpeg());
    let mut writer = Writer::new(library.opener(), NoPlayback, WriteConfig::default());
    let abort_flag = AtomicBool::new(false);

    let outcome = write_batch(
        &mut writer,
        [&a, &b],
        &mut |writer| {
            writer.set_title("Title");
            abort_flag.store(true, Ordering::Relaxed);
        },
        None::<&Reader>,
        &abort_flag,
    );
    assert_eq!(Completion::Aborted, outcome.completion);
    assert_eq!(1, outcome.summary.committed);
    assert!(library.tag(&b).get(TagKey::Id3Text("TIT2")).is_none());
}
