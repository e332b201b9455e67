//! Background auto-refresh timer
//!
//! Sends a tick over a tokio channel every interval; the main loop answers a
//! tick by re-fetching the cities currently on screen.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Default interval between automatic refreshes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Messages sent from the background timer to the main app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMessage {
    /// Time to re-fetch displayed cities
    Tick,
}

/// Configuration for the auto-refresh timer
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between refreshes
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh timer
///
/// Dropping the handle stops the timer.
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl RefreshHandle {
    /// Creates a new RefreshHandle and spawns the timer task when enabled
    pub fn spawn(config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(4);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let period = config.interval;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            debug!("auto-refresh tick");
                            if msg_tx.send(RefreshMessage::Tick).await.is_err() {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
                debug!("auto-refresh timer stopped");
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Checks for a pending tick without blocking
    pub fn try_recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }

    /// Stops the background timer
    pub fn shutdown(&mut self) {
        // Dropping the sender wakes the timer's `recv` with `None`
        self.shutdown_tx.take();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
