// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use tagmux_media_file::fs::file_exists;

use super::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub pruned: usize,
    pub retained: usize,
}

/// Remove all stored snapshots of files that no longer exist.
pub fn prune_missing<Repo>(repo: &mut Repo) -> Result<Summary>
where
    Repo: SnapshotRepo,
{
    let mut summary = Summary::default();
    for snapshot in repo.load_all_snapshots()? {
        let uri = snapshot.uri();
        if file_exists(uri) {
            summary.retained += 1;
            continue;
        }
        match repo.remove_snapshot(uri) {
            Ok(()) => {
                log::debug!("Pruned missing {uri}");
                summary.pruned += 1;
            }
            Err(RepoError::NotFound) => {
                log::debug!("Missing {uri} has already been removed");
            }
            Err(err) => return Err(err.into()),
        }
    }
    log::info!("Pruning of missing files finished: {summary:?}");
    Ok(summary)
}
