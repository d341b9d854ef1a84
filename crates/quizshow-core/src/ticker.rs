//! Free-running periodic refresh of the countdown.
//!
//! [`run_ticker`] wakes every tick interval, takes the router lock and
//! calls [`EventRouter::periodic_tick`]. It stops as soon as the shutdown
//! signal flips to `true` or its sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::router::EventRouter;

/// Drive periodic ticks until `shutdown` fires.
pub async fn run_ticker(
    router: Arc<Mutex<EventRouter>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    info!(period_ms = period.as_millis(), "Ticker started");

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                let published = router.lock().await.periodic_tick();
                if published {
                    debug!("Periodic timer refresh published");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!("Ticker stopped");
}

/// Spawn [`run_ticker`] on a background Tokio task.
pub fn spawn_ticker(
    router: Arc<Mutex<EventRouter>>,
    period: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run_ticker(router, period, shutdown))
}
