// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::result::Result as StdResult;

use thiserror::Error;

use tagmux_repo::prelude::*;

pub use tagmux_media_file::io::Completion;

pub mod store;
pub mod write_batch;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Repository(#[from] RepoError),
}

pub type Result<T> = StdResult<T, Error>;

#[cfg(test)]
mod testing;
