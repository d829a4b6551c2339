// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversions between file paths and URIs.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use url::Url;

use crate::{Error, IoError, Result};

pub fn file_path_from_url(url: &Url) -> Result<PathBuf> {
    let url_scheme = url.scheme();
    if url_scheme != "file" {
        return Err(Error::Io(IoError::other(anyhow!(
            "Unsupported URL scheme '{url_scheme}'"
        ))));
    }
    url.to_file_path().map_err(|()| {
        log::debug!("Failed to convert URL '{url}', into a local, absolute file path");
        Error::Io(IoError::other(anyhow!("Invalid or unsupported URL: {url}")))
    })
}

pub fn file_path_from_uri(uri: &str) -> Result<PathBuf> {
    let url = Url::parse(uri).map_err(|err| Error::Io(IoError::other(err)))?;
    file_path_from_url(&url)
}

/// The canonical URI that identifies a file.
///
/// Fails if the file does not exist.
pub fn canonical_url_from_path(file_path: impl AsRef<Path>) -> Result<Url> {
    let canonical_path = file_path.as_ref().canonicalize()?;
    if canonical_path.is_dir() {
        return Err(Error::Io(IoError::other(anyhow!(
            "Not a file: {}",
            canonical_path.display()
        ))));
    }
    Url::from_file_path(&canonical_path).map_err(|()| {
        Error::Io(IoError::other(anyhow!(
            "Invalid file path: {}",
            canonical_path.display()
        )))
    })
}

/// Check if the file referenced by the URI still exists.
///
/// URIs that do not reference a local file never exist.
#[must_use]
pub fn file_exists(uri: &str) -> bool {
    file_path_from_uri(uri).is_ok_and(|file_path| file_path.is_file())
}

/// The path of a sidecar file with the given extension next to the file.
#[must_use]
pub fn sidecar_path(file_path: &Path, extension: &str) -> PathBuf {
    file_path.with_extension(extension)
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
