// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification sink collaborator.
//!
//! The console UI owns the real notification surface; this crate only drives
//! its lifecycle. The daemon binary ships [`LogNotifier`], which writes every
//! notification to the tracing log.

use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

/// Opaque handle to one user-visible notification.
pub type NotificationHandle = Uuid;

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    /// One-shot informational notification that dismisses itself.
    fn info(&self, message: &str);

    /// Create a persistent progress notification and return its handle.
    fn show_progress(&self, message: &str) -> NotificationHandle;

    /// Mutate the message on an existing progress notification.
    fn update_progress(&self, handle: NotificationHandle, message: &str);

    /// Mark an existing progress notification terminal; it should dismiss
    /// itself after `auto_close`.
    fn complete_progress(&self, handle: NotificationHandle, message: &str, auto_close: Duration);

    /// Show a terminal notification directly, with no preceding progress
    /// phase. Used when the first update for a job already reads 100%.
    fn show_complete(&self, message: &str, auto_close: Duration) -> NotificationHandle;

    /// Drop a notification immediately.
    fn dismiss(&self, handle: NotificationHandle);
}

/// Notifier that writes notifications to the tracing log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        info!(msg = %message, "notify");
    }

    fn show_progress(&self, message: &str) -> NotificationHandle {
        let handle = Uuid::new_v4();
        info!(%handle, msg = %message, "notify progress");
        handle
    }

    fn update_progress(&self, handle: NotificationHandle, message: &str) {
        debug!(%handle, msg = %message, "notify update");
    }

    fn complete_progress(&self, handle: NotificationHandle, message: &str, auto_close: Duration) {
        info!(%handle, msg = %message, auto_close_ms = auto_close.as_millis() as u64, "notify complete");
    }

    fn show_complete(&self, message: &str, auto_close: Duration) -> NotificationHandle {
        let handle = Uuid::new_v4();
        info!(%handle, msg = %message, auto_close_ms = auto_close.as_millis() as u64, "notify complete");
        handle
    }

    fn dismiss(&self, handle: NotificationHandle) {
        debug!(%handle, "notify dismiss");
    }
}
