// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress tracking for long-running bulk jobs.
//!
//! The backend streams raw percentage updates per job: not necessarily
//! monotonic, not necessarily starting at zero, and 100% may repeat. The
//! tracker converts each job's stream into a clean notification lifecycle,
//! starting → updating → complete → cleared, with exactly one visible
//! "complete" per run and no duplicate or leaked notification handles.
//!
//! The one real race here is between a completion-clear timer and a restart
//! update for the same job. The discipline is unconditional: every update
//! cancels an outstanding timer before acting, and the timer re-checks the
//! job's phase under the tracker lock before clearing.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::notify::{NotificationHandle, Notifier};

/// External job identifier (playlist/account id) scoping one refresh task.
pub type JobId = u64;

/// Lifecycle phase of one tracked job. Absent from the map = cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Updating,
    Complete,
}

/// Tracker-owned state for one in-flight job.
#[derive(Debug)]
struct RefreshTask {
    phase: Phase,
    percent: u8,
    handle: NotificationHandle,
    /// Cancels the pending post-completion clear, if one is scheduled.
    clear: Option<CancellationToken>,
}

/// Per-job progress state machine, shared between the dispatcher and the
/// clear timers it schedules.
pub struct ProgressTracker {
    tasks: Arc<Mutex<HashMap<JobId, RefreshTask>>>,
    notifier: Arc<dyn Notifier>,
    clear_delay: Duration,
}

impl ProgressTracker {
    pub fn new(notifier: Arc<dyn Notifier>, clear_delay: Duration) -> Self {
        Self { tasks: Arc::new(Mutex::new(HashMap::new())), notifier, clear_delay }
    }

    /// Current phase of a job, if it is being tracked.
    pub fn phase(&self, job: JobId) -> Option<Phase> {
        self.tasks.lock().get(&job).map(|task| task.phase)
    }

    /// Last percentage seen for a job, if it is being tracked.
    pub fn percent(&self, job: JobId) -> Option<u8> {
        self.tasks.lock().get(&job).map(|task| task.percent)
    }

    /// Apply one raw progress update for `job`.
    pub fn handle_update(&self, job: JobId, percent: u8) {
        let percent = percent.min(100);
        let mut tasks = self.tasks.lock();

        match tasks.entry(job) {
            Entry::Vacant(entry) => {
                let task = if percent == 100 {
                    // First sighting already complete: no starting
                    // notification may ever be shown.
                    let handle =
                        self.notifier.show_complete(&complete_message(job), self.clear_delay);
                    RefreshTask {
                        phase: Phase::Complete,
                        percent: 100,
                        handle,
                        clear: Some(self.schedule_clear(job)),
                    }
                } else {
                    let handle = self.notifier.show_progress(&starting_message(job, percent));
                    RefreshTask { phase: Phase::Starting, percent, handle, clear: None }
                };
                entry.insert(task);
            }

            Entry::Occupied(mut entry) => {
                let task = entry.get_mut();

                // Cancel before acting, unconditionally. The timer may
                // already be past its sleep and waiting on the lock; it
                // re-checks this token.
                if let Some(clear) = task.clear.take() {
                    clear.cancel();
                }

                match task.phase {
                    Phase::Complete if percent < 100 => {
                        // Restart before the clear fired. The completed
                        // notification must not linger next to the fresh run's.
                        debug!(job, percent, "refresh restarted before clear");
                        self.notifier.dismiss(task.handle);
                        let handle = self.notifier.show_progress(&starting_message(job, percent));
                        *task = RefreshTask { phase: Phase::Starting, percent, handle, clear: None };
                    }
                    Phase::Complete => {
                        // Duplicate 100%: absorb it, keep the single completed
                        // notification, push the clear out again.
                        task.clear = Some(self.schedule_clear(job));
                    }
                    Phase::Starting | Phase::Updating if percent == 100 => {
                        task.phase = Phase::Complete;
                        task.percent = 100;
                        self.notifier.complete_progress(
                            task.handle,
                            &complete_message(job),
                            self.clear_delay,
                        );
                        task.clear = Some(self.schedule_clear(job));
                    }
                    Phase::Starting | Phase::Updating => {
                        task.phase = Phase::Updating;
                        task.percent = percent;
                        self.notifier.update_progress(task.handle, &updating_message(job, percent));
                    }
                }
            }
        }
    }

    /// Schedule the post-completion clear for `job` after `clear_delay`.
    ///
    /// The notification dismisses itself (`auto_close`); this timer only
    /// releases the tracker entry so a later run starts from Absent.
    fn schedule_clear(&self, job: JobId) -> CancellationToken {
        let token = CancellationToken::new();
        let guard = token.clone();
        let tasks = Arc::clone(&self.tasks);
        let delay = self.clear_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let mut tasks = tasks.lock();
                    // An update may have won the race for the lock and
                    // cancelled us after the sleep completed.
                    if guard.is_cancelled() {
                        return;
                    }
                    if tasks.get(&job).map(|task| task.phase) == Some(Phase::Complete) {
                        tasks.remove(&job);
                        debug!(job, "refresh task cleared");
                    }
                }
            }
        });
        token
    }
}

fn starting_message(job: JobId, percent: u8) -> String {
    format!("Playlist {job}: refresh starting ({percent}%)")
}

fn updating_message(job: JobId, percent: u8) -> String {
    format!("Playlist {job}: refresh {percent}%")
}

fn complete_message(job: JobId) -> String {
    format!("Playlist {job}: refresh complete")
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
