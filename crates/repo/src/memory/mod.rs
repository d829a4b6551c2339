// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Volatile, in-process storage.

use std::collections::BTreeMap;

use anyhow::anyhow;

use tagmux_core::Snapshot;

use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotRepo {
    snapshots: BTreeMap<String, Snapshot>,
}

impl MemorySnapshotRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotRepo for MemorySnapshotRepo {
    fn contains_snapshot(&mut self, uri: &str) -> RepoResult<bool> {
        Ok(self.snapshots.contains_key(uri))
    }

    fn load_snapshot(&mut self, uri: &str) -> RepoResult<Snapshot> {
        self.snapshots.get(uri).cloned().ok_or(RepoError::NotFound)
    }

    fn put_snapshot(&mut self, snapshot: Snapshot) -> RepoResult<()> {
        if snapshot.is_empty() || snapshot.uri().is_empty() {
            return Err(anyhow!("snapshot without URI").into());
        }
        self.snapshots.insert(snapshot.uri().to_owned(), snapshot);
        Ok(())
    }

    fn remove_snapshot(&mut self, uri: &str) -> RepoResult<()> {
        self.snapshots
            .remove(uri)
            .map(drop)
            .ok_or(RepoError::NotFound)
    }

    fn load_all_snapshots(&mut self) -> RepoResult<Vec<Snapshot>> {
        Ok(self.snapshots.values().cloned().collect())
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
