// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection manager: one persistent event socket with fixed-delay
//! reconnect.
//!
//! The socket handle never leaves the manager's task. Consumers observe
//! [`ConnectionManager::is_ready`], push outbound frames through
//! [`ConnectionManager::send`], and receive inbound text frames from the
//! mpsc channel returned by [`ConnectionManager::spawn`] — the dispatcher
//! consumes that channel without ever touching the transport.
//!
//! Reconnection is deliberately a fixed delay: no backoff, no jitter, no
//! attempt counting. A failed attempt is silent beyond `is_ready()` staying
//! false; state recovery happens when the next full snapshot arrives, so
//! there is no resume protocol to run on reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::SyncConfig;

/// Owns the single persistent event socket.
pub struct ConnectionManager {
    ready: Arc<AtomicBool>,
    out_tx: mpsc::UnboundedSender<String>,
}

impl ConnectionManager {
    /// Spawn the connection task. Returns the manager and the inbound frame
    /// stream consumed by the dispatcher.
    pub fn spawn(
        config: &SyncConfig,
        shutdown: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let ready = Arc::new(AtomicBool::new(false));
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(
            config.ws_url(),
            config.reconnect_delay(),
            Arc::clone(&ready),
            out_rx,
            frame_tx,
            shutdown,
        ));
        (Self { ready, out_tx }, frame_rx)
    }

    /// True while the socket is open.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Send one outbound text frame.
    ///
    /// Dropped silently when the socket is not ready: not queued, not
    /// retried, never an error. Callers that need delivery must check
    /// [`Self::is_ready`] first.
    pub fn send(&self, message: String) {
        if !self.is_ready() {
            debug!("socket not ready, dropping outbound frame");
            return;
        }
        let _ = self.out_tx.send(message);
    }
}

/// Connection loop: connect, pump frames until close, sleep the fixed delay,
/// repeat. Runs until `cancel` fires or the manager is dropped.
async fn run_socket(
    url: String,
    delay: Duration,
    ready: Arc<AtomicBool>,
    mut out_rx: mpsc::UnboundedReceiver<String>,
    frame_tx: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            return;
        }

        // Discard anything queued while we were down: send() is
        // drop-not-queue, and this also detects a dropped manager.
        loop {
            match out_rx.try_recv() {
                Ok(_) => continue,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => return,
            }
        }

        match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                ready.store(true, Ordering::SeqCst);
                debug!(%url, "event socket connected");
                let (mut write, mut read) = stream.split();

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            ready.store(false, Ordering::SeqCst);
                            return;
                        }

                        msg = out_rx.recv() => {
                            match msg {
                                Some(text) => {
                                    if write.send(Message::Text(text.into())).await.is_err() {
                                        break;
                                    }
                                }
                                None => {
                                    // Manager dropped; tear down.
                                    ready.store(false, Ordering::SeqCst);
                                    return;
                                }
                            }
                        }

                        msg = read.next() => {
                            match msg {
                                Some(Ok(Message::Text(text))) => {
                                    if frame_tx.send(text.to_string()).is_err() {
                                        // Dispatcher gone; tear down.
                                        ready.store(false, Ordering::SeqCst);
                                        return;
                                    }
                                }
                                Some(Ok(Message::Close(_))) | None => {
                                    debug!("event socket closed");
                                    break;
                                }
                                Some(Err(e)) => {
                                    debug!(err = %e, "event socket error");
                                    break;
                                }
                                _ => {} // ping/pong/binary ignored
                            }
                        }
                    }
                }
                ready.store(false, Ordering::SeqCst);
            }
            Err(e) => {
                debug!(err = %e, "event socket connect failed");
            }
        }

        // Fixed-delay reconnect: exactly one attempt scheduled per close.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
#[path = "conn_tests.rs"]
mod tests;
