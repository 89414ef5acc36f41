use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default interval between sweep passes: 5 minutes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Background task that reclaims idle sessions on a fixed interval,
/// independent of request traffic.
///
/// A sweep pass is a single bounded in-memory scan; the loop never holds
/// store locks between passes and exits promptly when its cancellation
/// token fires.
pub struct Sweeper {
    store: Arc<SessionStore>,
    interval: Duration,
}

impl Sweeper {
    /// Creates a sweeper over the given store.
    pub fn new(store: Arc<SessionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Spawns the sweep loop. Returns the join handle so the caller can
    /// await completion after cancelling `shutdown`.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval fires immediately; the store is typically empty at
            // startup and a no-op pass is harmless.
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("session sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = self.store.sweep_expired();
                        if removed > 0 {
                            info!(removed, "swept expired sessions");
                        } else {
                            debug!("sweep pass removed nothing");
                        }
                    }
                }
            }
        })
    }
}
