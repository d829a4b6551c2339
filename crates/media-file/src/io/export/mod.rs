// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Writing fields into files.

use std::{path::Path, thread, time::Duration};

use tagmux_core::{Chapters, Cover, Field, RgbColor, UtcDateTimeMs};

use crate::{
    Error,
    fmt::TagEditor,
    fs::{canonical_url_from_path, file_path_from_url},
    handle::{ContainerFormat, MemoryTag, OpenTag, TagHandle, file::LoftyOpener},
    playback::{NoPlayback, PlaybackControl},
};

/// Bounded exponential backoff for retrying a failed commit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryConfig {
    /// Number of retries after the first failed attempt.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub backoff_factor: u32,
}

impl RetryConfig {
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(250);
    pub const DEFAULT_BACKOFF_FACTOR: u32 = 2;

    /// The delays before each retry.
    pub fn backoffs(&self) -> impl Iterator<Item = Duration> + use<> {
        let Self {
            max_retries,
            initial_backoff,
            backoff_factor,
        } = *self;
        std::iter::successors(Some(initial_backoff), move |backoff| {
            Some(backoff.saturating_mul(backoff_factor))
        })
        .take(max_retries as usize)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
            backoff_factor: Self::DEFAULT_BACKOFF_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteConfig {
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Idle,
    Bound,
    Committing,
    Committed,
    Failed,
}

#[derive(Debug)]
struct Binding {
    uri: String,
    editor: TagEditor,
    /// Modifications are absorbed by a throwaway tag.
    degraded: bool,
}

#[derive(Debug)]
enum State {
    Idle,
    Bound(Binding),
    Committing,
    Committed { uri: String },
    Failed { uri: String },
}

/// Writes fields into a single file at a time.
///
/// Field setters never fail. Rejected values are logged and skipped.
/// Setters return `true` if the field has been modified.
#[derive(Debug)]
pub struct Writer<O = LoftyOpener, P = NoPlayback> {
    opener: O,
    playback: P,
    config: WriteConfig,
    state: State,
}

macro_rules! text_setters {
    ($($setter:ident => $field:ident,)+) => {
        $(
            pub fn $setter(&mut self, value: &str) -> bool {
                self.set_text(Field::$field, value)
            }
        )+
    };
}

impl<O, P> Writer<O, P>
where
    O: OpenTag,
    P: PlaybackControl,
{
    #[must_use]
    pub const fn new(opener: O, playback: P, config: WriteConfig) -> Self {
        Self {
            opener,
            playback,
            config,
            state: State::Idle,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &WriteConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> WriterState {
        match self.state {
            State::Idle => WriterState::Idle,
            State::Bound(_) => WriterState::Bound,
            State::Committing => WriterState::Committing,
            State::Committed { .. } => WriterState::Committed,
            State::Failed { .. } => WriterState::Failed,
        }
    }

    /// The URI of the bound or last committed file.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match &self.state {
            State::Idle | State::Committing => None,
            State::Bound(Binding { uri, .. })
            | State::Committed { uri }
            | State::Failed { uri } => Some(uri),
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.state, State::Bound(Binding { degraded: true, .. }))
    }

    #[must_use]
    pub fn pending_change_count(&self) -> usize {
        match &self.state {
            State::Bound(Binding { editor, .. }) => editor.changed_count(),
            _ => 0,
        }
    }

    /// Discard the bound file and all pending changes.
    pub fn reset(&mut self) {
        let pending_change_count = self.pending_change_count();
        if pending_change_count > 0 {
            log::debug!(
                "Discarding {pending_change_count} pending change(s) of {uri}",
                uri = self.uri().unwrap_or_default()
            );
        }
        self.state = State::Idle;
    }

    /// Open a file for modifying its fields.
    ///
    /// Pending changes of a previously bound file are discarded. If the
    /// file could not be opened then all modifications are absorbed by a
    /// throwaway tag and [`Writer::commit()`] does nothing.
    ///
    /// Returns `false` if the writer is degraded.
    pub fn bind(&mut self, file_path: impl AsRef<Path>) -> bool {
        self.reset();
        let file_path = file_path.as_ref();
        let (uri, opened) = match canonical_url_from_path(file_path) {
            Ok(url) => {
                let opened = file_path_from_url(&url)
                    .and_then(|file_path| self.opener.open_tag(&file_path));
                (String::from(url), opened)
            }
            Err(err) => (file_path.display().to_string(), Err(err)),
        };
        let opened = opened.and_then(|handle| {
            if handle.container_format() == ContainerFormat::Unsupported {
                return Err(Error::UnsupportedContainer);
            }
            Ok(handle)
        });
        let binding = match opened {
            Ok(handle) => Binding {
                uri,
                editor: TagEditor::new(handle),
                degraded: false,
            },
            Err(err) => {
                log::warn!("Failed to open {uri} for writing: {err}");
                Binding {
                    uri,
                    editor: TagEditor::new(degraded_tag()),
                    degraded: true,
                }
            }
        };
        let degraded = binding.degraded;
        self.state = State::Bound(binding);
        !degraded
    }

    fn editor(&mut self, field: Field) -> Option<&mut TagEditor> {
        if let State::Bound(Binding { editor, .. }) = &mut self.state {
            Some(editor)
        } else {
            log::debug!("Cannot write {field} without a bound file");
            None
        }
    }

    fn reader_value<T>(&self, read: impl FnOnce(&TagEditor) -> T) -> Option<T> {
        match &self.state {
            State::Bound(Binding { editor, .. }) => Some(read(editor)),
            _ => None,
        }
    }

    text_setters! {
        set_title => Title,
        set_album => Album,
        set_artist => Artist,
        set_album_artist => AlbumArtist,
        set_composer => Composer,
        set_publisher => Publisher,
        set_genre => Genre,
        set_category => Category,
        set_comment => Comment,
        set_lyrics => Lyrics,
        set_mood => Mood,
        set_encoder => Encoder,
    }

    /// Set a plain text field.
    ///
    /// Empty values delete the field.
    pub fn set_text(&mut self, field: Field, value: &str) -> bool {
        self.editor(field)
            .is_some_and(|editor| editor.set_text(field, value))
    }

    /// Set one of the generic custom fields.
    ///
    /// Only the slots that are not used as carriers are accepted.
    pub fn set_custom(&mut self, slot: usize, value: &str) -> bool {
        let Some(field) = Field::custom(slot) else {
            log::warn!("Invalid custom field slot {slot}");
            return false;
        };
        self.set_text(field, value)
    }

    pub fn set_track(&mut self, track: Option<u32>) -> bool {
        self.editor(Field::Track)
            .is_some_and(|editor| editor.set_number(Field::Track, track))
    }

    pub fn set_tracks_total(&mut self, tracks_total: Option<u32>) -> bool {
        self.editor(Field::TracksTotal)
            .is_some_and(|editor| editor.set_number(Field::TracksTotal, tracks_total))
    }

    pub fn set_disc(&mut self, disc: Option<u32>) -> bool {
        self.editor(Field::Disc)
            .is_some_and(|editor| editor.set_number(Field::Disc, disc))
    }

    pub fn set_discs_total(&mut self, discs_total: Option<u32>) -> bool {
        self.editor(Field::DiscsTotal)
            .is_some_and(|editor| editor.set_number(Field::DiscsTotal, discs_total))
    }

    pub fn set_year(&mut self, year: Option<i32>) -> bool {
        self.editor(Field::Year)
            .is_some_and(|editor| editor.set_year(year))
    }

    /// Set the rating as a percentage in the range [0, 1].
    pub fn set_rating(&mut self, percentage: Option<f64>) -> bool {
        self.editor(Field::Rating)
            .is_some_and(|editor| editor.set_rating(percentage))
    }

    /// Set the native rating value. Negative values delete the rating.
    pub fn set_rating_raw(&mut self, raw: i64) -> bool {
        self.editor(Field::RatingRaw)
            .is_some_and(|editor| editor.set_rating_raw(raw))
    }

    pub fn set_play_count(&mut self, play_count: Option<u64>) -> bool {
        self.editor(Field::PlayCount)
            .is_some_and(|editor| editor.set_play_count(play_count))
    }

    pub fn increment_playcount(&mut self) -> bool {
        let Some(play_count) = self.reader_value(|editor| editor.reader().play_count()) else {
            return false;
        };
        self.set_play_count(Some(play_count.unwrap_or(0).saturating_add(1)))
    }

    pub fn set_color(&mut self, color: Option<RgbColor>) -> bool {
        self.editor(Field::Color)
            .is_some_and(|editor| editor.set_color(color))
    }

    pub fn set_tags<I, S>(&mut self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.editor(Field::Tags)
            .is_some_and(|editor| editor.set_tags(tags))
    }

    pub fn set_chapters(&mut self, chapters: &Chapters) -> bool {
        self.editor(Field::Chapters)
            .is_some_and(|editor| editor.set_chapters(chapters))
    }

    pub fn set_first_played(&mut self, timestamp: Option<UtcDateTimeMs>) -> bool {
        self.set_timestamp(Field::FirstPlayed, timestamp)
    }

    pub fn set_last_played(&mut self, timestamp: Option<UtcDateTimeMs>) -> bool {
        self.set_timestamp(Field::LastPlayed, timestamp)
    }

    pub fn set_added_to_library(&mut self, timestamp: Option<UtcDateTimeMs>) -> bool {
        self.set_timestamp(Field::AddedToLibrary, timestamp)
    }

    fn set_timestamp(&mut self, field: Field, timestamp: Option<UtcDateTimeMs>) -> bool {
        self.editor(field)
            .is_some_and(|editor| editor.set_timestamp(field, timestamp))
    }

    /// Update the last played timestamp.
    ///
    /// The first played timestamp is initialized if missing.
    pub fn set_played_now(&mut self) -> bool {
        let Some(first_played) =
            self.reader_value(|editor| editor.reader().custom_attributes().played_first)
        else {
            return false;
        };
        let now = UtcDateTimeMs::now();
        let mut modified = self.set_last_played(Some(now));
        if first_played.is_none() {
            modified |= self.set_first_played(Some(now));
        }
        modified
    }

    pub fn set_cover(&mut self, cover: Option<&Cover>) -> bool {
        self.editor(Field::Cover)
            .is_some_and(|editor| editor.set_cover(cover))
    }

    /// Set a field from its textual form.
    pub fn set_field(&mut self, field: Field, value: &str) -> bool {
        self.editor(field)
            .is_some_and(|editor| editor.set_field(field, value))
    }

    /// Write all pending changes into the bound file.
    ///
    /// Does nothing and returns `false` if the writer is degraded or
    /// if there are no pending changes.
    ///
    /// If writing fails while the file is opened for playback then
    /// playback is suspended and writing is retried. Playback is resumed
    /// afterwards, even if all retries failed.
    pub fn commit(&mut self) -> bool {
        let binding = match std::mem::replace(&mut self.state, State::Committing) {
            State::Bound(binding) => binding,
            state => {
                log::debug!("Nothing to commit without a bound file");
                self.state = state;
                return false;
            }
        };
        if binding.degraded {
            log::debug!("Skipping commit of degraded {uri}", uri = binding.uri);
            self.state = State::Bound(binding);
            return false;
        }
        if binding.editor.changed_count() == 0 {
            log::debug!("No pending changes of {uri}", uri = binding.uri);
            self.state = State::Bound(binding);
            return false;
        }
        let Binding {
            uri, mut editor, ..
        } = binding;
        let committed = self.persist_safely(&uri, &mut editor);
        self.state = if committed {
            log::debug!("Committed changes of {uri}");
            State::Committed { uri }
        } else {
            State::Failed { uri }
        };
        committed
    }

    fn persist_safely(&self, uri: &str, editor: &mut TagEditor) -> bool {
        let err = match editor.persist() {
            Ok(()) => return true,
            Err(err) => err,
        };
        if !self.playback.is_currently_open(uri) {
            log::warn!("Failed to write {uri}: {err}");
            return false;
        }
        log::warn!("Failed to write {uri} while playing: {err}");
        if !self.playback.suspend() {
            log::warn!("Suspending playback has not been acknowledged");
        }
        let committed = retry_persist(&self.config.retry, uri, editor);
        if !self.playback.resume() {
            log::warn!("Resuming playback has not been acknowledged");
        }
        committed
    }
}

fn retry_persist(retry: &RetryConfig, uri: &str, editor: &mut TagEditor) -> bool {
    for (attempt, backoff) in retry.backoffs().enumerate() {
        thread::sleep(backoff);
        match editor.persist() {
            Ok(()) => {
                log::info!("Wrote {uri} after suspending playback");
                return true;
            }
            Err(err) => {
                log::warn!(
                    "Retry {retry} of {max_retries} failed for {uri}: {err}",
                    retry = attempt + 1,
                    max_retries = retry.max_retries
                );
            }
        }
    }
    false
}

/// Absorbs all modifications. Supports all fields.
fn degraded_tag() -> Box<dyn TagHandle> {
    Box::new(MemoryTag::new(ContainerFormat::Mpeg))
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
