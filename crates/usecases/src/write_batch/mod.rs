// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Applying the same modifications to many files.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

use tagmux_core::Snapshot;
use tagmux_media_file::{
    handle::OpenTag,
    io::{export::Writer, import::Reader},
    playback::PlaybackControl,
};

use super::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub committed: usize,

    /// Nothing to commit.
    pub unchanged: usize,

    /// Missing, unreadable, or not writable.
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub completion: Completion,
    pub summary: Summary,

    /// Fresh snapshots of all committed files, in order.
    ///
    /// Only populated if re-reading has been requested.
    pub snapshots: Vec<Snapshot>,
}

/// Bind, modify, and commit each file in turn.
///
/// Files are processed sequentially in the given order. Aborting is
/// checked before each file, never while committing. The writer is
/// reset when done.
pub fn write_batch<O, P, R, I, Q, MutateFn>(
    writer: &mut Writer<O, P>,
    file_paths: I,
    mutate_fn: &mut MutateFn,
    reread: Option<&Reader<R>>,
    abort_flag: &AtomicBool,
) -> Outcome
where
    O: OpenTag,
    P: PlaybackControl,
    R: OpenTag,
    I: IntoIterator<Item = Q>,
    Q: AsRef<Path>,
    MutateFn: FnMut(&mut Writer<O, P>),
{
    let started_at = Instant::now();
    let mut summary = Summary::default();
    let mut completion = Completion::Finished;
    let mut committed_paths: Vec<PathBuf> = Vec::new();
    for file_path in file_paths {
        if abort_flag.load(Ordering::Relaxed) {
            log::debug!("Aborting batch write: {summary:?}");
            completion = Completion::Aborted;
            break;
        }
        let file_path = file_path.as_ref();
        if !writer.bind(file_path) {
            summary.failed += 1;
            continue;
        }
        mutate_fn(writer);
        if writer.pending_change_count() == 0 {
            summary.unchanged += 1;
            continue;
        }
        if writer.commit() {
            summary.committed += 1;
            committed_paths.push(file_path.to_path_buf());
        } else {
            summary.failed += 1;
        }
    }
    writer.reset();
    log::info!(
        "Batch write {completion:?} after {elapsed:?}: {summary:?}",
        elapsed = started_at.elapsed()
    );
    let snapshots = reread
        .map(|reader| {
            committed_paths
                .iter()
                .map(|file_path| reader.read_one(file_path))
                .filter(|snapshot| !snapshot.is_empty())
                .collect()
        })
        .unwrap_or_default();
    Outcome {
        completion,
        summary,
        snapshots,
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
