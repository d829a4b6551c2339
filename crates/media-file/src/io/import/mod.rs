// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reading snapshots from files.

use std::{
    io::ErrorKind,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use bitflags::bitflags;

use tagmux_core::{Chapters, Snapshot};

use super::Completion;
use crate::{
    Error, Result,
    fmt::TagReader,
    fs::{canonical_url_from_path, file_path_from_url, sidecar_path},
    handle::{ContainerFormat, OpenTag, file::LoftyOpener},
};

#[rustfmt::skip]
bitflags! {
    /// Flags for controlling the reader
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ReadFlags: u8 {
        /// Decode the embedded front cover
        const COVER           = 0b0000_0001;

        /// Merge chapters from a legacy sidecar file
        ///
        /// One chapter per line in a file with the same stem as the
        /// audio file.
        const CHAPTER_SIDECAR = 0b0000_0010;
    }
}

impl Default for ReadFlags {
    fn default() -> Self {
        Self::all()
    }
}

pub const DEFAULT_CHAPTER_SIDECAR_EXT: &str = "chp";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadConfig {
    pub flags: ReadFlags,

    /// File extension of chapter sidecar files
    ///
    /// Sidecar files are ignored if `None`.
    pub chapter_sidecar_ext: Option<String>,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            flags: Default::default(),
            chapter_sidecar_ext: Some(DEFAULT_CHAPTER_SIDECAR_EXT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub read: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub elapsed: Duration,
    pub summary: Summary,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub completion: Completion,
    pub summary: Summary,
    /// The snapshots of all files that have been read, in order.
    pub snapshots: Vec<Snapshot>,
}

/// Reads files into [`Snapshot`]s.
#[derive(Debug, Clone, Default)]
pub struct Reader<O = LoftyOpener> {
    opener: O,
    config: ReadConfig,
}

impl<O> Reader<O>
where
    O: OpenTag,
{
    #[must_use]
    pub const fn new(opener: O, config: ReadConfig) -> Self {
        Self { opener, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ReadConfig {
        &self.config
    }

    #[must_use]
    pub const fn opener(&self) -> &O {
        &self.opener
    }

    /// Read a single file.
    pub fn try_read_one(&self, file_path: &Path) -> Result<Snapshot> {
        let url = canonical_url_from_path(file_path)?;
        let file_path = file_path_from_url(&url)?;
        let file_size = std::fs::metadata(&file_path)?.len();
        let handle = self.opener.open_tag(&file_path)?;
        if handle.container_format() == ContainerFormat::Unsupported {
            return Err(Error::UnsupportedContainer);
        }
        let ReadConfig {
            flags,
            chapter_sidecar_ext,
        } = &self.config;
        let mut body = TagReader::new(handle.as_ref()).read_body(flags.contains(ReadFlags::COVER));
        body.uri = url.into();
        body.path = file_path.display().to_string();
        body.file_size = Some(file_size);
        if flags.contains(ReadFlags::CHAPTER_SIDECAR)
            && let Some(sidecar_chapters) = chapter_sidecar_ext
                .as_deref()
                .and_then(|ext| read_chapter_sidecar(&file_path, ext))
        {
            log::debug!(
                "Merging {count} chapter(s) from sidecar file of {path}",
                count = sidecar_chapters.len(),
                path = body.path
            );
            body.chapters = std::mem::take(&mut body.chapters).merge(sidecar_chapters);
        }
        Ok(Snapshot::new(body))
    }

    /// Read a single file.
    ///
    /// Returns [`Snapshot::empty()`] if the file could not be read.
    #[must_use]
    pub fn read_one(&self, file_path: impl AsRef<Path>) -> Snapshot {
        let file_path = file_path.as_ref();
        self.try_read_one(file_path).unwrap_or_else(|err| {
            log::warn!("Failed to read {}: {err}", file_path.display());
            Snapshot::empty()
        })
    }

    /// Read multiple files sequentially.
    ///
    /// Files that could not be read are skipped. Aborting is checked
    /// before reading each file.
    pub fn read_many<I, P, ReportProgressFn>(
        &self,
        file_paths: I,
        report_progress_fn: &mut ReportProgressFn,
        abort_flag: &AtomicBool,
    ) -> Outcome
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        ReportProgressFn: FnMut(ProgressEvent),
    {
        let started_at = Instant::now();
        let mut summary = Summary::default();
        let mut snapshots = Vec::new();
        let mut completion = Completion::Finished;
        for file_path in file_paths {
            report_progress_fn(ProgressEvent {
                elapsed: started_at.elapsed(),
                summary: summary.clone(),
            });
            if abort_flag.load(Ordering::Relaxed) {
                log::debug!("Aborting reading of files: {summary:?}");
                completion = Completion::Aborted;
                break;
            }
            let snapshot = self.read_one(file_path);
            if snapshot.is_empty() {
                summary.failed += 1;
                continue;
            }
            summary.read += 1;
            snapshots.push(snapshot);
        }
        report_progress_fn(ProgressEvent {
            elapsed: started_at.elapsed(),
            summary: summary.clone(),
        });
        log::info!(
            "Reading of files {completion:?} after {elapsed:?}: {summary:?}",
            elapsed = started_at.elapsed()
        );
        Outcome {
            completion,
            summary,
            snapshots,
        }
    }
}

/// Read chapters from the sidecar file of an audio file, if any.
fn read_chapter_sidecar(file_path: &Path, extension: &str) -> Option<Chapters> {
    let sidecar_path = sidecar_path(file_path, extension);
    if sidecar_path == file_path {
        return None;
    }
    match std::fs::read_to_string(&sidecar_path) {
        Ok(lines) => Some(Chapters::decode_lines(&lines)).filter(|chapters| !chapters.is_empty()),
        Err(err) => {
            if err.kind() != ErrorKind::NotFound {
                log::warn!(
                    "Failed to read chapters from {}: {err}",
                    sidecar_path.display()
                );
            }
            None
        }
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
