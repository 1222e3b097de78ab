// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Host:port the backend's development server listens on. Used instead of
/// the configured pair when `--dev` is set.
const DEV_HOST: &str = "127.0.0.1";
const DEV_PORT: u16 = 8001;

/// Configuration for the livesync client.
#[derive(Debug, Clone, clap::Parser)]
pub struct SyncConfig {
    /// Backend host serving the event feed.
    #[arg(long, default_value = "127.0.0.1", env = "LIVESYNC_HOST")]
    pub host: String,

    /// Backend port.
    #[arg(long, default_value_t = 9191, env = "LIVESYNC_PORT")]
    pub port: u16,

    /// Use TLS (wss://) for the event socket.
    #[arg(long, env = "LIVESYNC_SECURE")]
    pub secure: bool,

    /// Connect to the fixed local development backend instead of host/port.
    #[arg(long, env = "LIVESYNC_DEV")]
    pub dev: bool,

    /// Reconnect delay in milliseconds. Fixed — no backoff, no jitter.
    #[arg(long, default_value_t = 3000, env = "LIVESYNC_RECONNECT_DELAY_MS")]
    pub reconnect_delay_ms: u64,

    /// Delay in milliseconds before a completed refresh notification is
    /// auto-dismissed and its tracker entry cleared.
    #[arg(long, default_value_t = 2000, env = "LIVESYNC_CLEAR_DELAY_MS")]
    pub clear_delay_ms: u64,
}

impl SyncConfig {
    /// Build the event feed URL: scheme from `secure`, host:port from config
    /// or the fixed development pair.
    pub fn ws_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let (host, port) = if self.dev {
            (DEV_HOST, DEV_PORT)
        } else {
            (self.host.as_str(), self.port)
        };
        format!("{scheme}://{host}:{port}/ws/")
    }

    pub fn reconnect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn clear_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.clear_delay_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
