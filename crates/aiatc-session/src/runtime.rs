//! Session lifecycle: starts background work and tears it down.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::chat::ChatService;
use crate::engine::AtcEngine;
use crate::loops::proximity_loop::run_proximity_loop;

/// A running simulator session.
pub struct SessionRuntime<C> {
    engine: Arc<AtcEngine<C>>,
    shutdown: broadcast::Sender<()>,
    proximity: JoinHandle<()>,
}

impl<C: ChatService> SessionRuntime<C> {
    /// Spawn the proximity loop on the current tokio runtime.
    pub fn start(engine: Arc<AtcEngine<C>>) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        let proximity = tokio::spawn(run_proximity_loop(
            engine.clone(),
            engine.config().proximity_interval(),
            shutdown.subscribe(),
        ));

        tracing::info!(
            "Session started, polling proximity every {} ms",
            engine.config().proximity_interval_ms
        );
        Self {
            engine,
            shutdown,
            proximity,
        }
    }

    pub fn engine(&self) -> &Arc<AtcEngine<C>> {
        &self.engine
    }

    pub fn is_tracking(&self) -> bool {
        !self.proximity.is_finished()
    }

    /// Stop background work and wait for it to finish.
    pub async fn shutdown(self) {
        // The loop may already have stopped on its own
        let _ = self.shutdown.send(());
        if let Err(e) = self.proximity.await {
            tracing::warn!("Proximity loop ended abnormally: {}", e);
        }
        tracing::info!("Session ended");
    }
}
