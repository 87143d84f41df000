use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use schema::Periodic;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

/// Handle to a repeating timer driving a `Periodic` task.
///
/// The first round runs immediately, subsequent rounds every `period` at a fixed rate.
/// Dropping the handle stops the timer just as `stop` does, without waiting for it.
pub struct Ticker {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    ticks: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn the timer onto the current tokio runtime.
    /// Panics if `period` is zero.
    pub fn spawn<P: Periodic>(periodic: Arc<P>, period: Duration) -> Self {
        let name = periodic.name();
        let (shutdown, mut shutdown_receiver) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        log::info!("starting {} every {:?}", name, period);
        let task = tokio::spawn(async move {
            let mut timer = IntervalStream::new(tokio::time::interval(period));

            loop {
                tokio::select! {
                    biased;

                    // Either a stop request or the handle going away
                    _ = shutdown_receiver.changed() => break,

                    Some(_) = timer.next() => {
                        let report = periodic.tick();
                        let round = counter.fetch_add(1, Ordering::Relaxed) + 1;
                        log::debug!(
                            "{} round {}: {} visited, {} failed",
                            name,
                            round,
                            report.visited,
                            report.failed
                        );
                    }
                }
            }

            log::info!("{} stopped", name);
        });

        Self {
            name,
            shutdown,
            ticks,
            task,
        }
    }

    /// Number of rounds completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Prevent any further rounds, letting a round already in progress finish
    pub async fn stop(self) {
        log::info!("stopping {}", self.name);
        let _ = self.shutdown.send(true);

        if let Err(e) = self.task.await {
            log::warn!("{} task ended abnormally: {}", self.name, e);
        }
    }
}
