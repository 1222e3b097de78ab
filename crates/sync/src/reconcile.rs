// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot reconciliation: turns full live-stream snapshots into discrete
//! join/leave transitions.
//!
//! Every `channel_stats` envelope carries a complete listing of the channels
//! currently streaming and the clients watching them. The reconciler diffs
//! each snapshot against the previous one by id, at both granularities, and
//! emits exactly one event per presence transition. Membership is never
//! inferred from partial payloads; each snapshot fully replaces the last.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Full point-in-time listing of active channels and their clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveSnapshot {
    #[serde(default)]
    pub channels: Vec<ChannelSnapshot>,
}

/// One actively streaming channel within a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSnapshot {
    pub channel_id: u64,
    #[serde(default)]
    pub clients: Vec<ClientSnapshot>,
}

/// One connected client, nested under its channel on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSnapshot {
    pub client_id: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
}

impl LiveSnapshot {
    /// Decode the JSON string carried in a `channel_stats` envelope.
    pub fn parse(stats: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(stats)
    }
}

/// Reconciler-owned record of one client, flattened out of its channel.
/// `channel_id` is a display back-reference, not an ownership link.
#[derive(Debug, Clone)]
struct ClientEntry {
    channel_id: u64,
    ip_address: String,
}

/// Discrete live-state transition derived from two consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    ChannelStarted { channel_id: u64 },
    ChannelStopped { channel_id: u64 },
    ClientConnected { client_id: String, channel_id: u64, ip_address: String },
    ClientDisconnected { client_id: String, channel_id: u64 },
}

impl LiveEvent {
    /// Human-readable notification text for this transition.
    pub fn describe(&self) -> String {
        match self {
            Self::ChannelStarted { channel_id } => {
                format!("Channel {channel_id} started streaming")
            }
            Self::ChannelStopped { channel_id } => {
                format!("Channel {channel_id} stopped streaming")
            }
            Self::ClientConnected { client_id, channel_id, ip_address } => {
                format!("Client {client_id} ({ip_address}) connected to channel {channel_id}")
            }
            Self::ClientDisconnected { client_id, channel_id } => {
                format!("Client {client_id} left channel {channel_id}")
            }
        }
    }
}

/// Diffs successive [`LiveSnapshot`]s into [`LiveEvent`]s.
///
/// The first snapshot of a session only seeds state and emits nothing;
/// diffing it against an empty baseline would fire a burst of spurious
/// "channel started" notifications on startup.
#[derive(Debug, Default)]
pub struct Reconciler {
    previous_channels: HashMap<u64, ChannelSnapshot>,
    previous_clients: HashMap<String, ClientEntry>,
    baseline_established: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the first snapshot has been absorbed.
    pub fn baseline_established(&self) -> bool {
        self.baseline_established
    }

    /// Apply one snapshot, returning every presence transition since the
    /// previous one.
    ///
    /// An id present in both snapshots emits nothing even if its nested
    /// attributes changed; only presence drives events. Emission order
    /// within one snapshot is unspecified, but each transitioning id
    /// produces exactly one event.
    pub fn apply(&mut self, snapshot: &LiveSnapshot) -> Vec<LiveEvent> {
        let mut new_channels = HashMap::with_capacity(snapshot.channels.len());
        let mut new_clients = HashMap::new();
        for channel in &snapshot.channels {
            new_channels.insert(channel.channel_id, channel.clone());
            for client in &channel.clients {
                new_clients.insert(
                    client.client_id.clone(),
                    ClientEntry {
                        channel_id: channel.channel_id,
                        ip_address: client.ip_address.clone(),
                    },
                );
            }
        }

        let mut events = Vec::new();
        if self.baseline_established {
            for id in new_channels.keys() {
                if !self.previous_channels.contains_key(id) {
                    events.push(LiveEvent::ChannelStarted { channel_id: *id });
                }
            }
            for id in self.previous_channels.keys() {
                if !new_channels.contains_key(id) {
                    events.push(LiveEvent::ChannelStopped { channel_id: *id });
                }
            }
            for (id, entry) in &new_clients {
                if !self.previous_clients.contains_key(id) {
                    events.push(LiveEvent::ClientConnected {
                        client_id: id.clone(),
                        channel_id: entry.channel_id,
                        ip_address: entry.ip_address.clone(),
                    });
                }
            }
            for (id, entry) in &self.previous_clients {
                if !new_clients.contains_key(id) {
                    events.push(LiveEvent::ClientDisconnected {
                        client_id: id.clone(),
                        channel_id: entry.channel_id,
                    });
                }
            }
        } else {
            self.baseline_established = true;
        }

        // Full replacement, never a merge.
        self.previous_channels = new_channels;
        self.previous_clients = new_clients;
        events
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
