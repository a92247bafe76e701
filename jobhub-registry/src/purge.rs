//! Periodic purge driver
//!
//! Calls [`Registry::purge_jobs`] on a fixed interval until its token fires.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::PurgeConfig;
use crate::registry::Registry;

/// Background loop removing finished jobs past their retention age
pub struct PurgeDriver {
    registry: Arc<Registry>,
    interval: Duration,
    max_age: Duration,
    /// `true` while a loop is active
    running: Arc<watch::Sender<bool>>,
}

/// Marks the loop as stopped when dropped, also if the loop task panics
struct StopGuard(Arc<watch::Sender<bool>>);

impl Drop for StopGuard {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

impl PurgeDriver {
    pub fn new(registry: Arc<Registry>, config: &PurgeConfig) -> Self {
        let (running, _) = watch::channel(false);
        Self {
            registry,
            // tokio intervals reject a zero period
            interval: config.interval.max(Duration::from_millis(1)),
            max_age: config.max_age,
            running: Arc::new(running),
        }
    }

    /// Starts the purge loop
    ///
    /// Does nothing and returns `false` if a loop started earlier is still
    /// active. The loop exits once `token` fires.
    pub fn start(&self, token: CancellationToken) -> bool {
        let started = self.running.send_if_modified(|running| {
            if *running {
                return false;
            }
            *running = true;
            true
        });

        if !started {
            debug!("Purge driver already running");
            return false;
        }

        info!(
            "Starting purge driver (interval: {:?}, max age: {:?})",
            self.interval, self.max_age
        );

        tokio::spawn(Self::run(
            Arc::clone(&self.registry),
            self.interval,
            self.max_age,
            token,
            StopGuard(Arc::clone(&self.running)),
        ));
        true
    }

    /// Waits until the active loop has exited
    ///
    /// Every concurrent caller blocks until then. Returns immediately when no
    /// loop is running.
    pub async fn wait(&self) {
        let mut stopped = self.running.subscribe();
        // the sender lives as long as `self`, so this cannot fail
        let _ = stopped.wait_for(|running| !*running).await;
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    async fn run(
        registry: Arc<Registry>,
        interval: Duration,
        max_age: Duration,
        token: CancellationToken,
        _stop: StopGuard,
    ) {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    debug!("Purging old jobs");
                    match registry.purge_jobs(max_age) {
                        Ok(n) => debug!("Purged {} old job(s)", n),
                        Err(e) => error!("Purging old jobs failed: {}", e),
                    }
                }
            }
        }

        info!("Purge driver stopped");
    }
}
