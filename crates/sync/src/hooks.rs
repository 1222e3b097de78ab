// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data-store refetch collaborator.
//!
//! Certain envelopes mean "your cached copy of collection X is stale". The
//! console's REST layer implements these contracts by re-pulling the named
//! collection; the daemon's default implementation only records the request.
//! Implementations must not block — spawn if the refetch is slow.

use tracing::debug;

/// Refetch contracts invoked as envelope side effects.
pub trait RefreshHooks: Send + Sync {
    fn refresh_channel_groups(&self);
    fn refresh_playlists(&self);
    fn refresh_streams(&self);
    fn refresh_channels(&self);
    fn refresh_epg(&self);
}

/// Hook set that logs each refetch request.
#[derive(Debug, Default)]
pub struct LogHooks;

impl RefreshHooks for LogHooks {
    fn refresh_channel_groups(&self) {
        debug!("refetch requested: channel groups");
    }

    fn refresh_playlists(&self) {
        debug!("refetch requested: playlists");
    }

    fn refresh_streams(&self) {
        debug!("refetch requested: streams");
    }

    fn refresh_channels(&self) {
        debug!("refetch requested: channels");
    }

    fn refresh_epg(&self) {
        debug!("refetch requested: EPG data");
    }
}
