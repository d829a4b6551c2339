// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use tagmux_media_file::{fs::canonical_url_from_path, handle::OpenTag, io::import::Reader};

use super::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Read and stored.
    pub inserted: usize,

    /// Already stored and left untouched.
    pub skipped: usize,

    /// Missing or unreadable.
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub elapsed: Duration,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub completion: Completion,
    pub summary: Summary,
}

/// Read and store all files that are not stored yet.
///
/// Stored snapshots are never replaced, even if the file has been
/// modified in the meantime. Aborting is checked before each file.
pub fn reconcile_with_store<Repo, O, I, P, ReportProgressFn>(
    repo: &mut Repo,
    reader: &Reader<O>,
    file_paths: I,
    report_progress_fn: &mut ReportProgressFn,
    abort_flag: &AtomicBool,
) -> Result<Outcome>
where
    Repo: SnapshotRepo,
    O: OpenTag,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    ReportProgressFn: FnMut(ProgressEvent),
{
    let started_at = Instant::now();
    let mut summary = Summary::default();
    let mut completion = Completion::Finished;
    for file_path in file_paths {
        report_progress_fn(ProgressEvent {
            elapsed: started_at.elapsed(),
            summary: summary.clone(),
        });
        if abort_flag.load(Ordering::Relaxed) {
            log::debug!("Aborting reconciliation: {summary:?}");
            completion = Completion::Aborted;
            break;
        }
        let file_path = file_path.as_ref();
        let uri = match canonical_url_from_path(file_path) {
            Ok(url) => String::from(url),
            Err(err) => {
                log::warn!("Skipping {path}: {err}", path = file_path.display());
                summary.failed += 1;
                continue;
            }
        };
        if repo.contains_snapshot(&uri)? {
            log::debug!("Skipping stored {uri}");
            summary.skipped += 1;
            continue;
        }
        let snapshot = reader.read_one(file_path);
        if snapshot.is_empty() {
            summary.failed += 1;
            continue;
        }
        debug_assert_eq!(uri, snapshot.uri());
        repo.put_snapshot(snapshot)?;
        log::debug!("Stored {uri}");
        summary.inserted += 1;
    }
    report_progress_fn(ProgressEvent {
        elapsed: started_at.elapsed(),
        summary: summary.clone(),
    });
    log::info!(
        "Reconciliation {completion:?} after {elapsed:?}: {summary:?}",
        elapsed = started_at.elapsed()
    );
    Ok(Outcome {
        completion,
        summary,
    })
}
