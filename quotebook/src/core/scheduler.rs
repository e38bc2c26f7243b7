//! Periodic sync scheduler
//!
//! Runs reconciliation cycles one after another on a fixed period. Cycles
//! never overlap: ticks that come due while a cycle is still running are
//! skipped. The first cycle runs immediately on start.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};

use shared::{component_debug, component_error, component_info, Component};

use crate::core::reconciler::Reconciler;
use crate::error::{QuotebookError, QuotebookResult};
use crate::quotebook_impl::QuoteBook;
use crate::traits::{Clock, KeyValueStore, QuoteSource};
use crate::types::SyncEvent;

/// Default period between sync cycles
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10);

const EVENT_CAPACITY: usize = 16;

pub struct SyncScheduler<K, C, S>
where
    K: KeyValueStore,
    C: Clock,
    S: QuoteSource,
{
    book: Arc<QuoteBook<K, C>>,
    reconciler: Arc<Reconciler<S>>,
    period: Duration,

    // Change notifications
    events: broadcast::Sender<SyncEvent>,

    // Control channels
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: Option<mpsc::Receiver<()>>,
}

impl<K, C, S> SyncScheduler<K, C, S>
where
    K: KeyValueStore,
    C: Clock,
    S: QuoteSource,
{
    pub fn new(book: Arc<QuoteBook<K, C>>, reconciler: Reconciler<S>, period: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Self {
            book,
            reconciler: Arc::new(reconciler),
            period,
            events,
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// Receive a [`SyncEvent`] after every cycle
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Run a single cycle and broadcast its outcome
    ///
    /// Errors are folded into [`SyncEvent::Failed`]; they never stop the
    /// scheduler.
    pub async fn run_cycle(&self) -> SyncEvent {
        let event = match self.reconciler.reconcile(&*self.book).await {
            Ok(outcome) => SyncEvent::from(outcome),
            Err(e) => {
                // Transport failures are already reported by the reconciler
                if !matches!(e, QuotebookError::TransportFailure(_)) {
                    component_error!(Component::Scheduler, "❌ Sync cycle failed: {}", e);
                }
                SyncEvent::Failed {
                    error: e.to_string(),
                }
            }
        };

        // Nobody listening is fine
        let _ = self.events.send(event.clone());
        event
    }

    /// Run cycles until a shutdown signal arrives, returning the cycle count
    pub async fn run(&mut self) -> QuotebookResult<u64> {
        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .ok_or(QuotebookError::SchedulerAlreadyRunning)?;

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        component_info!(Component::Scheduler, "⏱️ Syncing every {:?}", self.period);

        let mut cycles = 0u64;
        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.recv() => {
                    component_info!(Component::Scheduler, "🛑 Stopping sync after {} cycles", cycles);
                    break;
                }

                _ = ticker.tick() => {
                    let event = self.run_cycle().await;
                    cycles += 1;
                    component_debug!(Component::Scheduler, "Cycle {} finished: {:?}", cycles, event);
                }
            }
        }

        Ok(cycles)
    }
}
