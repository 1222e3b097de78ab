// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire frame parsing: one inbound envelope per WebSocket text frame.
//!
//! The backend wraps every event exactly one level deep, `{"data": {...}}`,
//! and discriminates events on a string `type` field inside the wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `type` values this client recognizes. Anything else parses to
/// [`Envelope::Unknown`] so dispatch is total over all inputs.
const KNOWN_TYPES: &[&str] = &[
    "m3u_group_refresh",
    "m3u_refresh",
    "channel_stats",
    "epg_channels",
    "epg_match",
    "m3u_profile_test",
];

/// Decode failure for one inbound frame.
#[derive(Debug)]
pub enum FrameError {
    /// Frame was not valid JSON, or a recognized type carried bad fields.
    Json(serde_json::Error),
    /// Frame carried no string `type` discriminant.
    MissingType,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid frame JSON: {e}"),
            Self::MissingType => f.write_str("frame has no type field"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::MissingType => None,
        }
    }
}

/// One parsed inbound envelope, discriminated by the wire `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Channel groups were refreshed server-side.
    M3uGroupRefresh,
    /// Bulk M3U account refresh: completion flag and/or progress updates.
    M3uRefresh {
        #[serde(default)]
        success: bool,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        progress: Option<u8>,
        /// Playlist/account id keying the progress tracker.
        #[serde(default)]
        account: Option<u64>,
    },
    /// Full live-stream snapshot, JSON-encoded again inside `stats`.
    ChannelStats { stats: String },
    /// EPG channel data changed server-side.
    EpgChannels,
    /// EPG auto-matching finished.
    EpgMatch,
    /// Result of a live regex-preview probe.
    M3uProfileTest {
        #[serde(default)]
        search_preview: String,
        #[serde(default)]
        result: String,
    },
    /// Unrecognized `type`; logged and dropped by the dispatcher.
    #[serde(skip)]
    Unknown { kind: String },
}

/// Parse one raw inbound frame.
///
/// Tolerates exactly one level of `{"data": {...}}` wrapping; frames that
/// arrive without the wrapper parse the same way.
pub fn parse_frame(raw: &str) -> Result<Envelope, FrameError> {
    let value: Value = serde_json::from_str(raw).map_err(FrameError::Json)?;
    let body = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) => inner,
            _ => Value::Object(map),
        },
        other => other,
    };

    let kind = match body.get("type").and_then(|t| t.as_str()) {
        Some(kind) => kind.to_owned(),
        None => return Err(FrameError::MissingType),
    };
    if !KNOWN_TYPES.contains(&kind.as_str()) {
        return Ok(Envelope::Unknown { kind });
    }
    serde_json::from_value(body).map_err(FrameError::Json)
}

/// Outbound live regex-preview probe (client to server).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileTestRequest {
    #[serde(rename = "type")]
    kind: &'static str,
    pub url: String,
    pub search: String,
    pub replace: String,
}

impl ProfileTestRequest {
    pub fn new(url: &str, search: &str, replace: &str) -> Self {
        Self {
            kind: "m3u_profile_test",
            url: url.to_owned(),
            search: search.to_owned(),
            replace: replace.to_owned(),
        }
    }

    /// Serialize to one outbound text frame.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
