// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use super::{Phase, ProgressTracker};
use crate::test_support::RecordingNotifier;

const JOB: u64 = 7;

fn tracker(clear_ms: u64) -> (ProgressTracker, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let tracker = ProgressTracker::new(
        Arc::clone(&notifier) as Arc<dyn crate::notify::Notifier>,
        Duration::from_millis(clear_ms),
    );
    (tracker, notifier)
}

#[tokio::test]
async fn idempotent_completion() {
    let (tracker, notifier) = tracker(10_000);
    for percent in [0, 35, 70, 100, 100, 100] {
        tracker.handle_update(JOB, percent);
    }

    assert_eq!(notifier.count("show"), 1, "{:?}", notifier.calls());
    assert!(notifier.count("update") >= 1);
    assert_eq!(notifier.count("complete"), 1, "duplicate 100% updates must be absorbed");
    assert_eq!(notifier.count("show_complete"), 0);
    assert_eq!(tracker.phase(JOB), Some(Phase::Complete));
}

#[tokio::test]
async fn instant_completion_skips_starting() {
    let (tracker, notifier) = tracker(10_000);
    tracker.handle_update(JOB, 100);

    assert_eq!(notifier.count("show_complete"), 1);
    assert_eq!(notifier.count("show"), 0, "no starting notification may precede it");
    assert_eq!(notifier.count("update"), 0);
    assert_eq!(tracker.phase(JOB), Some(Phase::Complete));
}

#[tokio::test]
async fn restart_cancels_pending_clear() {
    let (tracker, notifier) = tracker(200);
    tracker.handle_update(JOB, 100);
    tracker.handle_update(JOB, 0);

    // The stale completed notification is gone and a fresh run is visible.
    assert_eq!(notifier.count("dismiss"), 1);
    assert_eq!(notifier.count("show"), 1);
    assert_eq!(tracker.phase(JOB), Some(Phase::Starting));

    // The cancelled timer must not clear the restarted task.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(tracker.phase(JOB), Some(Phase::Starting));
}

#[tokio::test]
async fn clear_timer_releases_task() {
    let (tracker, _notifier) = tracker(50);
    tracker.handle_update(JOB, 100);
    assert_eq!(tracker.phase(JOB), Some(Phase::Complete));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(tracker.phase(JOB), None, "completed task must auto-clear");
}

#[tokio::test]
async fn duplicate_completion_reschedules_clear() {
    let (tracker, notifier) = tracker(200);
    tracker.handle_update(JOB, 100);
    tokio::time::sleep(Duration::from_millis(120)).await;

    // Second 100% before the first clear fires: still one completed
    // notification, and the clear deadline moves out.
    tracker.handle_update(JOB, 100);
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(tracker.phase(JOB), Some(Phase::Complete));
    assert_eq!(notifier.count("show_complete") + notifier.count("complete"), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(tracker.phase(JOB), None);
}

#[tokio::test]
async fn run_after_clear_is_a_fresh_lifecycle() {
    let (tracker, notifier) = tracker(50);
    tracker.handle_update(JOB, 100);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(tracker.phase(JOB), None);

    tracker.handle_update(JOB, 10);
    tracker.handle_update(JOB, 100);
    assert_eq!(notifier.count("show"), 1);
    assert_eq!(notifier.count("complete"), 1);
}

#[tokio::test]
async fn jobs_are_tracked_independently() {
    let (tracker, notifier) = tracker(10_000);
    tracker.handle_update(1, 40);
    tracker.handle_update(2, 100);
    tracker.handle_update(1, 100);

    assert_eq!(tracker.phase(1), Some(Phase::Complete));
    assert_eq!(tracker.phase(2), Some(Phase::Complete));
    assert_eq!(notifier.count("show"), 1);
    assert_eq!(notifier.count("show_complete"), 1);
    assert_eq!(notifier.count("complete"), 1);
}

#[tokio::test]
async fn nonmonotonic_progress_stays_one_notification() {
    let (tracker, notifier) = tracker(10_000);
    for percent in [60, 20, 80, 45] {
        tracker.handle_update(JOB, percent);
    }
    assert_eq!(notifier.count("show"), 1);
    assert_eq!(notifier.count("update"), 3);
    assert_eq!(tracker.phase(JOB), Some(Phase::Updating));
    assert_eq!(tracker.percent(JOB), Some(45), "tracker must hold the latest raw percent");
}
