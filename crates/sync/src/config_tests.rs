// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

use super::SyncConfig;

fn parse(args: &[&str]) -> SyncConfig {
    SyncConfig::parse_from(args)
}

#[test]
fn defaults() {
    let config = parse(&["livesync"]);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9191);
    assert!(!config.secure);
    assert!(!config.dev);
    assert_eq!(config.reconnect_delay(), Duration::from_millis(3000));
    assert_eq!(config.clear_delay(), Duration::from_millis(2000));
}

#[yare::parameterized(
    plain   = { &["livesync"], "ws://127.0.0.1:9191/ws/" },
    secure  = { &["livesync", "--secure"], "wss://127.0.0.1:9191/ws/" },
    custom  = { &["livesync", "--host", "iptv.example.com", "--port", "443", "--secure"],
                "wss://iptv.example.com:443/ws/" },
    dev     = { &["livesync", "--host", "iptv.example.com", "--port", "443", "--dev"],
                "ws://127.0.0.1:8001/ws/" },
    dev_tls = { &["livesync", "--dev", "--secure"], "wss://127.0.0.1:8001/ws/" },
)]
fn ws_url(args: &[&str], expected: &str) {
    assert_eq!(parse(args).ws_url(), expected);
}

#[test]
fn delay_overrides() {
    let config = parse(&["livesync", "--reconnect-delay-ms", "250", "--clear-delay-ms", "50"]);
    assert_eq!(config.reconnect_delay(), Duration::from_millis(250));
    assert_eq!(config.clear_delay(), Duration::from_millis(50));
}
