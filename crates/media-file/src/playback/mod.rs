// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Coordination with a playback engine that might hold files open.

use std::{
    sync::{Arc, RwLock, mpsc},
    time::Duration,
};

/// The capabilities of a playback engine needed for writing tags.
pub trait PlaybackControl {
    /// Whether the file with the given URI is currently opened for playback.
    fn is_currently_open(&self, uri: &str) -> bool;

    /// Release the currently opened file.
    ///
    /// Returns `true` if the request has been acknowledged.
    fn suspend(&self) -> bool;

    /// Reopen the file after [`PlaybackControl::suspend()`].
    ///
    /// Returns `true` if the request has been acknowledged.
    fn resume(&self) -> bool;
}

impl<T> PlaybackControl for &T
where
    T: PlaybackControl + ?Sized,
{
    fn is_currently_open(&self, uri: &str) -> bool {
        (*self).is_currently_open(uri)
    }

    fn suspend(&self) -> bool {
        (*self).suspend()
    }

    fn resume(&self) -> bool {
        (*self).resume()
    }
}

/// No playback at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlayback;

impl PlaybackControl for NoPlayback {
    fn is_currently_open(&self, _uri: &str) -> bool {
        false
    }

    fn suspend(&self) -> bool {
        true
    }

    fn resume(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackRequest {
    Suspend,
    Resume,
}

/// A request received by the playback engine.
///
/// Must be acknowledged after it has been handled.
#[derive(Debug)]
pub struct PlaybackCommand {
    request: PlaybackRequest,
    ack_tx: mpsc::Sender<()>,
}

impl PlaybackCommand {
    #[must_use]
    pub const fn request(&self) -> PlaybackRequest {
        self.request
    }

    pub fn acknowledge(self) {
        if self.ack_tx.send(()).is_err() {
            log::debug!("Requester stopped waiting for {:?}", self.request);
        }
    }
}

type OpenUri = Arc<RwLock<Option<String>>>;

/// The requesting side of a message channel to the playback engine.
#[derive(Debug, Clone)]
pub struct PlaybackChannel {
    command_tx: mpsc::Sender<PlaybackCommand>,
    open_uri: OpenUri,
    ack_timeout: Duration,
}

/// The side of the message channel that is owned by the playback engine.
#[derive(Debug)]
pub struct PlaybackEndpoint {
    command_rx: mpsc::Receiver<PlaybackCommand>,
    open_uri: OpenUri,
}

pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Create a connected pair of both ends.
///
/// Requests that are not acknowledged within `ack_timeout` are
/// considered as failed.
#[must_use]
pub fn playback_channel(ack_timeout: Duration) -> (PlaybackChannel, PlaybackEndpoint) {
    let (command_tx, command_rx) = mpsc::channel();
    let open_uri = OpenUri::default();
    let channel = PlaybackChannel {
        command_tx,
        open_uri: Arc::clone(&open_uri),
        ack_timeout,
    };
    let endpoint = PlaybackEndpoint {
        command_rx,
        open_uri,
    };
    (channel, endpoint)
}

impl PlaybackChannel {
    fn send_request(&self, request: PlaybackRequest) -> bool {
        let (ack_tx, ack_rx) = mpsc::channel();
        log::debug!("Sending playback request {request:?}");
        if self
            .command_tx
            .send(PlaybackCommand { request, ack_tx })
            .is_err()
        {
            // Channel is closed, i.e. the endpoint has been dropped
            log::debug!("Failed to send playback request {request:?}");
            return false;
        }
        match ack_rx.recv_timeout(self.ack_timeout) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Playback request {request:?} has not been acknowledged: {err}");
                false
            }
        }
    }
}

impl PlaybackControl for PlaybackChannel {
    fn is_currently_open(&self, uri: &str) -> bool {
        self.open_uri
            .read()
            .map(|open_uri| open_uri.as_deref() == Some(uri))
            .unwrap_or(false)
    }

    fn suspend(&self) -> bool {
        self.send_request(PlaybackRequest::Suspend)
    }

    fn resume(&self) -> bool {
        self.send_request(PlaybackRequest::Resume)
    }
}

impl PlaybackEndpoint {
    /// Publish the URI of the file that is currently opened for playback.
    pub fn set_open_uri(&self, uri: Option<String>) {
        match self.open_uri.write() {
            Ok(mut open_uri) => *open_uri = uri,
            Err(err) => log::error!("Failed to publish opened file: {err}"),
        }
    }

    /// Wait for the next request.
    ///
    /// Returns `None` if all requesters have been dropped.
    #[must_use]
    pub fn recv(&self) -> Option<PlaybackCommand> {
        self.command_rx.recv().ok()
    }

    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PlaybackCommand> {
        self.command_rx.recv_timeout(timeout).ok()
    }

    #[must_use]
    pub fn try_recv(&self) -> Option<PlaybackCommand> {
        self.command_rx.try_recv().ok()
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
