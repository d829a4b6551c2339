// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Audio file tags with application-private attributes.
//!
//! Re-exports the member crates, selected by features.

pub use tagmux_core as core;

#[cfg(feature = "media-file")]
pub use tagmux_media_file as media_file;

#[cfg(feature = "repo")]
pub use tagmux_repo as repo;

#[cfg(feature = "usecases")]
pub use tagmux_usecases as usecases;
