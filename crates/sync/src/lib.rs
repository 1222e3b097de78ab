// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Livesync: real-time synchronization client for the IPTV management console.
//!
//! Maintains one persistent WebSocket connection to the backend's event feed
//! and keeps derived live state correct across disconnects, duplicate or
//! out-of-order snapshots, and rapid state transitions: which channels and
//! clients are currently streaming, and how far each bulk playlist refresh
//! has progressed.
//!
//! The console's CRUD surface (REST client, forms, tables, playback) lives
//! elsewhere; it plugs into this crate through the [`hooks::RefreshHooks`]
//! and [`notify::Notifier`] collaborator traits.

pub mod config;
pub mod conn;
pub mod dispatch;
pub mod envelope;
pub mod hooks;
pub mod notify;
pub mod progress;
pub mod reconcile;
pub mod test_support;

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use crate::config::SyncConfig;
use crate::conn::ConnectionManager;
use crate::dispatch::{Dispatcher, ProfilePreview};
use crate::envelope::ProfileTestRequest;
use crate::hooks::RefreshHooks;
use crate::notify::Notifier;
use crate::progress::ProgressTracker;
use crate::reconcile::LiveEvent;

/// Handle to a running sync client.
///
/// Explicitly constructed and dependency-injected — nothing in this crate is
/// a global singleton. Consumers subscribe to [`LiveEvent`]s and read the
/// preview store rather than reaching into ambient context.
pub struct SyncClient {
    conn: ConnectionManager,
    events: broadcast::Sender<LiveEvent>,
    preview: Arc<RwLock<Option<ProfilePreview>>>,
}

impl SyncClient {
    /// Connect to the backend event feed and start dispatching.
    ///
    /// Spawns the connection task and the dispatch loop; both stop when
    /// `shutdown` is cancelled.
    pub fn connect(
        config: &SyncConfig,
        hooks: Arc<dyn RefreshHooks>,
        notifier: Arc<dyn Notifier>,
        shutdown: CancellationToken,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let preview = Arc::new(RwLock::new(None));
        let (conn, frames) = ConnectionManager::spawn(config, shutdown);
        let tracker = ProgressTracker::new(Arc::clone(&notifier), config.clear_delay());
        let dispatcher =
            Dispatcher::new(tracker, hooks, notifier, events.clone(), Arc::clone(&preview));
        tokio::spawn(dispatcher.run(frames));
        Self { conn, events, preview }
    }

    /// True while the event socket is open.
    pub fn is_ready(&self) -> bool {
        self.conn.is_ready()
    }

    /// Subscribe to live channel/client transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.events.subscribe()
    }

    /// Latest profile regex-preview result, if any has arrived.
    pub async fn preview(&self) -> Option<ProfilePreview> {
        self.preview.read().await.clone()
    }

    /// Send a live regex-preview probe to the backend.
    ///
    /// Dropped silently when the socket is not ready; check [`Self::is_ready`]
    /// first if delivery matters.
    pub fn send_profile_test(&self, url: &str, search: &str, replace: &str) {
        self.conn.send(ProfileTestRequest::new(url, search, replace).to_frame());
    }
}

/// Run the sync daemon until ctrl-c.
pub async fn run(config: SyncConfig) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let client = SyncClient::connect(
        &config,
        Arc::new(crate::hooks::LogHooks),
        Arc::new(crate::notify::LogNotifier),
        shutdown.clone(),
    );

    tracing::info!(url = %config.ws_url(), "livesync started, watching event feed");

    // Mirror live transitions into the journal for consumers that tail logs
    // instead of subscribing in-process.
    let mut events = client.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(event = %event.describe(), "live transition"),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    shutdown.cancel();
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
