// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Keeping stored snapshots in sync with files.
//!
//! Both operations are idempotent. Files that cannot be read are
//! counted and skipped. Only failures of the store abort an operation.

use super::*;

pub mod prune_missing;
pub mod reconcile;

pub use self::{prune_missing::prune_missing, reconcile::reconcile_with_store};

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
