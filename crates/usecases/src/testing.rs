// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A directory of empty files with their tags kept in memory.

use std::{
    collections::BTreeMap,
    fs,
    io::{Error as IoError, ErrorKind},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use tempfile::TempDir;

use tagmux_core::Cover;
use tagmux_media_file::{
    Result as MediaResult,
    handle::{AudioProperties, ContainerFormat, MemoryTag, TagHandle, TagKey},
};

#[derive(Debug, Default)]
struct Tags {
    by_path: Mutex<BTreeMap<PathBuf, MemoryTag>>,
    open_count: AtomicUsize,
}

#[derive(Debug)]
struct LibraryTag {
    path: PathBuf,
    tag: MemoryTag,
    tags: Arc<Tags>,
}

impl TagHandle for LibraryTag {
    fn container_format(&self) -> ContainerFormat {
        self.tag.container_format()
    }

    fn properties(&self) -> AudioProperties {
        self.tag.properties()
    }

    fn get(&self, key: TagKey) -> Option<String> {
        self.tag.get(key)
    }

    fn set(&mut self, key: TagKey, value: &str) -> MediaResult<()> {
        self.tag.set(key, value)
    }

    fn remove(&mut self, key: TagKey) -> MediaResult<()> {
        self.tag.remove(key)
    }

    fn cover(&self) -> Option<Cover> {
        self.tag.cover()
    }

    fn set_cover(&mut self, cover: Option<&Cover>) -> MediaResult<()> {
        self.tag.set_cover(cover)
    }

    fn persist(&mut self) -> MediaResult<()> {
        self.tags
            .by_path
            .lock()
            .unwrap()
            .insert(self.path.clone(), self.tag.clone());
        Ok(())
    }
}

pub(crate) struct Library {
    dir: TempDir,
    tags: Arc<Tags>,
}

impl Library {
    pub(crate) fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            tags: Default::default(),
        }
    }

    pub(crate) fn add_file(&self, file_name: &str, tag: MemoryTag) -> PathBuf {
        let file_path = self.dir.path().join(file_name);
        fs::write(&file_path, b"").unwrap();
        let file_path = file_path.canonicalize().unwrap();
        self.tags
            .by_path
            .lock()
            .unwrap()
            .insert(file_path.clone(), tag);
        file_path
    }

    pub(crate) fn missing_file(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    pub(crate) fn delete_file(&self, file_path: &Path) {
        fs::remove_file(file_path).unwrap();
    }

    pub(crate) fn tag(&self, file_path: &Path) -> MemoryTag {
        self.tags.by_path.lock().unwrap()[file_path].clone()
    }

    pub(crate) fn open_count(&self) -> usize {
        self.tags.open_count.load(Ordering::SeqCst)
    }

    pub(crate) fn opener(&self) -> impl Fn(&Path) -> MediaResult<Box<dyn TagHandle>> + use<> {
        let tags = Arc::clone(&self.tags);
        move |file_path: &Path| -> MediaResult<Box<dyn TagHandle>> {
            let path = file_path.canonicalize()?;
            let tag = tags
                .by_path
                .lock()
                .unwrap()
                .get(&path)
                .cloned()
                .ok_or_else(|| IoError::from(ErrorKind::NotFound))?;
            tags.open_count.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(LibraryTag {
                path,
                tag,
                tags: Arc::clone(&tags),
            }))
        }
    }
}
