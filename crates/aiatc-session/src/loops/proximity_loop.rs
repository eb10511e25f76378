//! Periodic nearest-airport polling.
//!
//! The simulator offers no change notifications for aircraft position, so
//! the nearest airport is recomputed on a fixed period.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};

use crate::chat::ChatService;
use crate::engine::AtcEngine;

/// Run proximity ticks until shutdown is signalled.
pub async fn run_proximity_loop<C: ChatService>(
    engine: Arc<AtcEngine<C>>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Proximity loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                match engine.proximity_tick() {
                    Ok(Some(code)) => tracing::debug!("Nearest airport is now {}", code),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!("Proximity tracking stopped: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
