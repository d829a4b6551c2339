// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `Default::default()` expressions is not needed
// as long as the context is obvious.
#![allow(clippy::default_trait_access)]
// Using wildcard imports consciously is acceptable.
#![allow(clippy::wildcard_imports)]
// Importing all enum variants into a narrow, local scope is acceptable.
#![allow(clippy::enum_glob_use)]
#![allow(clippy::missing_errors_doc)]

pub mod chapter;
pub mod custom;
pub mod field;
pub mod rating;
pub mod snapshot;
pub mod util;

pub use self::{
    chapter::{Chapter, Chapters},
    custom::{CustomAttributes, CustomKey},
    field::{Field, FieldValue, Origin, SemanticType},
    rating::Rating,
    snapshot::{Cover, Snapshot, SnapshotBody},
    util::{
        clock::{DurationMs, UtcDateTimeMs},
        color::RgbColor,
    },
};

pub mod prelude {
    pub(crate) use semval::prelude::*;
    // Re-export trait methods from semval
    pub use semval::{IsValid, Validate as _};

    pub(crate) use crate::util::{clock::*, color::*};
}
