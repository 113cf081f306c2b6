//! Periodic admin refresh
//!
//! Each tick spawns its own refresh task, so a slow round never holds back
//! the next one. Rounds may overlap; whichever finishes last leaves its data
//! in the cache.

use crate::admin::{AdminController, RefreshReport};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Start refreshing every `period`, first tick one period from now.
///
/// Reports arrive on the returned channel; dropping the receiver stops the
/// loop at its next tick.
pub fn spawn_auto_refresh(
    controller: AdminController,
    period: Duration,
) -> (JoinHandle<()>, mpsc::UnboundedReceiver<RefreshReport>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                debug!("Refresh receiver dropped, stopping poller");
                break;
            }

            let controller = controller.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let report = controller.refresh().await;
                let _ = tx.send(report);
            });
        }
    });

    (handle, rx)
}
