// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Envelope dispatch: routes each parsed envelope to exactly one handler.
//!
//! The dispatcher consumes the connection manager's frame channel
//! sequentially, so handling runs to completion per message and two frames
//! are never interleaved. Dispatch is total: malformed frames and unknown
//! types are logged and dropped, never escalated.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, warn};

use crate::envelope::{parse_frame, Envelope};
use crate::hooks::RefreshHooks;
use crate::notify::Notifier;
use crate::progress::ProgressTracker;
use crate::reconcile::{LiveEvent, LiveSnapshot, Reconciler};

/// Latest live regex-preview result pushed by the backend. Stored verbatim;
/// no reconciliation applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePreview {
    pub search_preview: String,
    pub result: String,
}

/// Routes envelopes to the reconciler, the progress tracker, and the
/// collaborator hooks. One instance per connection.
pub struct Dispatcher {
    reconciler: Reconciler,
    tracker: ProgressTracker,
    hooks: Arc<dyn RefreshHooks>,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<LiveEvent>,
    preview: Arc<RwLock<Option<ProfilePreview>>>,
}

impl Dispatcher {
    pub fn new(
        tracker: ProgressTracker,
        hooks: Arc<dyn RefreshHooks>,
        notifier: Arc<dyn Notifier>,
        events: broadcast::Sender<LiveEvent>,
        preview: Arc<RwLock<Option<ProfilePreview>>>,
    ) -> Self {
        Self { reconciler: Reconciler::new(), tracker, hooks, notifier, events, preview }
    }

    /// Consume inbound frames until the connection task closes the channel.
    pub async fn run(mut self, mut frames: mpsc::UnboundedReceiver<String>) {
        while let Some(frame) = frames.recv().await {
            self.handle_frame(&frame).await;
        }
        debug!("frame channel closed, dispatcher stopping");
    }

    /// Handle one raw frame.
    pub async fn handle_frame(&mut self, raw: &str) {
        let envelope = match parse_frame(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(err = %e, "dropping malformed frame");
                return;
            }
        };

        match envelope {
            Envelope::M3uGroupRefresh => {
                self.hooks.refresh_channel_groups();
                self.hooks.refresh_playlists();
                self.notifier.info("Channel groups refreshed");
            }

            Envelope::M3uRefresh { success, message, progress, account } => {
                if success {
                    self.hooks.refresh_streams();
                    self.notifier.info(message.as_deref().unwrap_or("Playlist refresh finished"));
                }
                if let (Some(progress), Some(account)) = (progress, account) {
                    self.tracker.handle_update(account, progress);
                    if progress >= 100 {
                        // A finished bulk import invalidates everything it
                        // may have touched.
                        self.hooks.refresh_streams();
                        self.hooks.refresh_channel_groups();
                        self.hooks.refresh_epg();
                        self.hooks.refresh_playlists();
                    }
                }
            }

            Envelope::ChannelStats { stats } => match LiveSnapshot::parse(&stats) {
                Ok(snapshot) => {
                    for event in self.reconciler.apply(&snapshot) {
                        self.notifier.info(&event.describe());
                        let _ = self.events.send(event);
                    }
                }
                Err(e) => warn!(err = %e, "dropping undecodable channel stats"),
            },

            Envelope::EpgChannels => {
                self.hooks.refresh_epg();
                self.notifier.info("EPG channels updated");
            }

            Envelope::EpgMatch => {
                self.hooks.refresh_channels();
                self.hooks.refresh_epg();
                self.notifier.info("EPG matching complete");
            }

            Envelope::M3uProfileTest { search_preview, result } => {
                *self.preview.write().await = Some(ProfilePreview { search_preview, result });
            }

            Envelope::Unknown { kind } => {
                debug!(kind = %kind, "ignoring unknown envelope type");
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
