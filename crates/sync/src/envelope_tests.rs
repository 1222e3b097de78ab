// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::{parse_frame, Envelope, FrameError, ProfileTestRequest};

fn wrapped(body: serde_json::Value) -> String {
    json!({ "data": body }).to_string()
}

#[test]
fn group_refresh_parses() -> anyhow::Result<()> {
    let envelope = parse_frame(&wrapped(json!({ "type": "m3u_group_refresh" })))?;
    assert!(matches!(envelope, Envelope::M3uGroupRefresh));
    Ok(())
}

#[test]
fn m3u_refresh_extracts_fields() -> anyhow::Result<()> {
    let envelope = parse_frame(&wrapped(json!({
        "type": "m3u_refresh",
        "success": true,
        "message": "Refreshed 1200 streams",
        "progress": 100,
        "account": 7
    })))?;
    match envelope {
        Envelope::M3uRefresh { success, message, progress, account } => {
            assert!(success);
            assert_eq!(message.as_deref(), Some("Refreshed 1200 streams"));
            assert_eq!(progress, Some(100));
            assert_eq!(account, Some(7));
        }
        other => anyhow::bail!("unexpected envelope: {other:?}"),
    }
    Ok(())
}

#[test]
fn m3u_refresh_fields_all_optional() -> anyhow::Result<()> {
    let envelope = parse_frame(&wrapped(json!({ "type": "m3u_refresh" })))?;
    assert!(matches!(
        envelope,
        Envelope::M3uRefresh { success: false, message: None, progress: None, account: None }
    ));
    Ok(())
}

#[test]
fn channel_stats_keeps_encoded_payload() -> anyhow::Result<()> {
    let stats = json!({ "channels": [] }).to_string();
    let envelope = parse_frame(&wrapped(json!({ "type": "channel_stats", "stats": stats })))?;
    match envelope {
        Envelope::ChannelStats { stats: got } => assert_eq!(got, stats),
        other => anyhow::bail!("unexpected envelope: {other:?}"),
    }
    Ok(())
}

#[test]
fn profile_test_result_parses() -> anyhow::Result<()> {
    let envelope = parse_frame(&wrapped(json!({
        "type": "m3u_profile_test",
        "search_preview": "Sports <HD>",
        "result": "Sports"
    })))?;
    match envelope {
        Envelope::M3uProfileTest { search_preview, result } => {
            assert_eq!(search_preview, "Sports <HD>");
            assert_eq!(result, "Sports");
        }
        other => anyhow::bail!("unexpected envelope: {other:?}"),
    }
    Ok(())
}

#[test]
fn unwrapped_frame_parses_too() -> anyhow::Result<()> {
    let envelope = parse_frame(&json!({ "type": "epg_channels" }).to_string())?;
    assert!(matches!(envelope, Envelope::EpgChannels));
    Ok(())
}

#[test]
fn unknown_type_is_not_an_error() -> anyhow::Result<()> {
    let envelope = parse_frame(&wrapped(json!({ "type": "recording_started", "id": 3 })))?;
    match envelope {
        Envelope::Unknown { kind } => assert_eq!(kind, "recording_started"),
        other => anyhow::bail!("unexpected envelope: {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(parse_frame("{not json"), Err(FrameError::Json(_))));
}

#[yare::parameterized(
    no_type       = { r#"{"data":{"payload":1}}"# },
    type_not_str  = { r#"{"data":{"type":42}}"# },
    bare_array    = { r#"[1,2,3]"# },
    bare_string   = { r#""hello""# },
)]
fn missing_type_is_rejected(raw: &str) {
    assert!(matches!(parse_frame(raw), Err(FrameError::MissingType)));
}

// Dispatch must be total over the full space of type strings, not just the
// recognized set.
#[test]
fn arbitrary_unknown_types_never_error() -> anyhow::Result<()> {
    let mut seed: u64 = 0x5eed;
    for _ in 0..1000 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let kind = format!("evt_{seed:x}");
        let envelope = parse_frame(&wrapped(json!({ "type": kind, "noise": seed })))?;
        match envelope {
            Envelope::Unknown { kind: got } => assert_eq!(got, kind),
            other => anyhow::bail!("unexpected envelope: {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn probe_request_serializes_with_type_tag() -> anyhow::Result<()> {
    let frame = ProfileTestRequest::new("http://x/playlist.m3u", "(.*) HD", "$1").to_frame();
    let value: serde_json::Value = serde_json::from_str(&frame)?;
    assert_eq!(value["type"], "m3u_profile_test");
    assert_eq!(value["url"], "http://x/playlist.m3u");
    assert_eq!(value["search"], "(.*) HD");
    assert_eq!(value["replace"], "$1");
    Ok(())
}
