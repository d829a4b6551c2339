// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_core::Snapshot;

use crate::prelude::*;

/// Persistent storage of snapshots, keyed by their URI.
///
/// Each operation is a transaction of its own.
pub trait SnapshotRepo {
    fn contains_snapshot(&mut self, uri: &str) -> RepoResult<bool>;

    fn load_snapshot(&mut self, uri: &str) -> RepoResult<Snapshot>;

    /// Insert or replace a snapshot.
    ///
    /// Snapshots without a URI, including [`Snapshot::empty()`],
    /// are rejected.
    fn put_snapshot(&mut self, snapshot: Snapshot) -> RepoResult<()>;

    fn remove_snapshot(&mut self, uri: &str) -> RepoResult<()>;

    /// All snapshots, ordered by URI.
    fn load_all_snapshots(&mut self) -> RepoResult<Vec<Snapshot>>;
}

impl<T> SnapshotRepo for &mut T
where
    T: SnapshotRepo + ?Sized,
{
    fn contains_snapshot(&mut self, uri: &str) -> RepoResult<bool> {
        (**self).contains_snapshot(uri)
    }

    fn load_snapshot(&mut self, uri: &str) -> RepoResult<Snapshot> {
        (**self).load_snapshot(uri)
    }

    fn put_snapshot(&mut self, snapshot: Snapshot) -> RepoResult<()> {
        (**self).put_snapshot(snapshot)
    }

    fn remove_snapshot(&mut self, uri: &str) -> RepoResult<()> {
        (**self).remove_snapshot(uri)
    }

    fn load_all_snapshots(&mut self) -> RepoResult<Vec<Snapshot>> {
        (**self).load_all_snapshots()
    }
}
