// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording collaborator fakes shared across unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::hooks::RefreshHooks;
use crate::notify::{NotificationHandle, Notifier};

/// Notifier that records every call as `"op:detail"` strings.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    log: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// Number of recorded calls whose op matches `op`.
    pub fn count(&self, op: &str) -> usize {
        let prefix = format!("{op}:");
        self.log.lock().iter().filter(|entry| entry.starts_with(&prefix)).count()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.log.lock().push(format!("info:{message}"));
    }

    fn show_progress(&self, message: &str) -> NotificationHandle {
        self.log.lock().push(format!("show:{message}"));
        Uuid::new_v4()
    }

    fn update_progress(&self, handle: NotificationHandle, message: &str) {
        self.log.lock().push(format!("update:{handle}:{message}"));
    }

    fn complete_progress(&self, handle: NotificationHandle, message: &str, _auto_close: Duration) {
        self.log.lock().push(format!("complete:{handle}:{message}"));
    }

    fn show_complete(&self, message: &str, _auto_close: Duration) -> NotificationHandle {
        self.log.lock().push(format!("show_complete:{message}"));
        Uuid::new_v4()
    }

    fn dismiss(&self, handle: NotificationHandle) {
        self.log.lock().push(format!("dismiss:{handle}"));
    }
}

/// Hook set counting refetch requests per collection.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub channel_groups: AtomicUsize,
    pub playlists: AtomicUsize,
    pub streams: AtomicUsize,
    pub channels: AtomicUsize,
    pub epg: AtomicUsize,
}

impl RecordingHooks {
    /// Total refetch requests across all collections.
    pub fn total(&self) -> usize {
        self.channel_groups.load(Ordering::SeqCst)
            + self.playlists.load(Ordering::SeqCst)
            + self.streams.load(Ordering::SeqCst)
            + self.channels.load(Ordering::SeqCst)
            + self.epg.load(Ordering::SeqCst)
    }
}

impl RefreshHooks for RecordingHooks {
    fn refresh_channel_groups(&self) {
        self.channel_groups.fetch_add(1, Ordering::SeqCst);
    }

    fn refresh_playlists(&self) {
        self.playlists.fetch_add(1, Ordering::SeqCst);
    }

    fn refresh_streams(&self) {
        self.streams.fetch_add(1, Ordering::SeqCst);
    }

    fn refresh_channels(&self) {
        self.channels.fetch_add(1, Ordering::SeqCst);
    }

    fn refresh_epg(&self) {
        self.epg.fetch_add(1, Ordering::SeqCst);
    }
}
