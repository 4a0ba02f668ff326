//! Debounced edit streams feeding the pair synchronizer.
//!
//! Each side has its own worker, so typing on one side never delays the other.
//! A worker waits for a quiet period after the last accepted edit, then starts a
//! conversion with the latest value, aborting the side's previous conversion if it
//! is still running.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::currency::{CurrencyPair, Side};
use super::error::{FxError, ValidationRejected};
use super::input::parse_edit;
use super::sync::{EditOutcome, PairSynchronizer};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Result of one debounced conversion, reported to whoever owns the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Applied { side: Side, pair: CurrencyPair },
    Superseded { side: Side },
    Failed { side: Side, error: FxError },
}

/// Aborts the task when dropped.
struct TaskGuard(JoinHandle<()>);

impl TaskGuard {
    async fn join(&mut self) {
        if let Err(e) = (&mut self.0).await
            && e.is_panic()
        {
            warn!(error = %e, "Edit stream task panicked");
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct EditStream {
    from_tx: mpsc::UnboundedSender<f64>,
    to_tx: mpsc::UnboundedSender<f64>,
    workers: [TaskGuard; 2],
}

impl EditStream {
    /// Spawns the per-side workers. Outcomes arrive on the returned receiver.
    ///
    /// Must be called from within a Tokio runtime. Dropping the stream stops both
    /// workers together with any conversion they started.
    pub fn new(
        sync: Arc<PairSynchronizer>,
        window: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (from_tx, from_rx) = mpsc::unbounded_channel();
        let (to_tx, to_rx) = mpsc::unbounded_channel();

        let from_worker = tokio::spawn(debounce_side(
            Side::From,
            from_rx,
            window,
            Arc::clone(&sync),
            events_tx.clone(),
        ));
        let to_worker = tokio::spawn(debounce_side(Side::To, to_rx, window, sync, events_tx));

        let stream = EditStream {
            from_tx,
            to_tx,
            workers: [TaskGuard(from_worker), TaskGuard(to_worker)],
        };
        (stream, events_rx)
    }

    /// Queues the raw text of an amount field. Invalid text is dropped without
    /// emitting anything.
    pub fn push(&self, side: Side, raw: &str) -> Result<(), ValidationRejected> {
        let amount = parse_edit(raw).inspect_err(|_| {
            debug!(side = %side, raw, "Rejected edit");
        })?;
        let tx = match side {
            Side::From => &self.from_tx,
            Side::To => &self.to_tx,
        };
        if tx.send(amount).is_err() {
            warn!(side = %side, "Edit stream worker has stopped");
        }
        Ok(())
    }

    /// Releases the stream, abandoning pending edits. Same as dropping it.
    pub fn close(self) {}

    /// Stops accepting edits, runs any edit still waiting out its debounce window
    /// right away and waits for the resulting conversions to finish.
    pub async fn finish(self) {
        let EditStream {
            from_tx,
            to_tx,
            mut workers,
        } = self;
        drop(from_tx);
        drop(to_tx);
        for worker in &mut workers {
            worker.join().await;
        }
    }
}

async fn debounce_side(
    side: Side,
    mut edits: mpsc::UnboundedReceiver<f64>,
    window: Duration,
    sync: Arc<PairSynchronizer>,
    events: mpsc::UnboundedSender<SyncEvent>,
) {
    let mut pending: Option<f64> = None;
    let mut in_flight: Option<TaskGuard> = None;

    loop {
        match pending {
            Some(amount) => {
                tokio::select! {
                    edit = edits.recv() => match edit {
                        Some(next) => pending = Some(next),
                        None => {
                            in_flight = Some(TaskGuard(tokio::spawn(convert(
                                side,
                                amount,
                                Arc::clone(&sync),
                                events.clone(),
                            ))));
                            break;
                        }
                    },
                    _ = tokio::time::sleep(window) => {
                        pending = None;
                        debug!(side = %side, amount, "Debounce window elapsed");
                        // Replacing the guard aborts the previous conversion.
                        in_flight = Some(TaskGuard(tokio::spawn(convert(
                            side,
                            amount,
                            Arc::clone(&sync),
                            events.clone(),
                        ))));
                    }
                }
            }
            None => match edits.recv().await {
                Some(next) => pending = Some(next),
                None => break,
            },
        }
    }

    debug!(side = %side, "Edit stream closed");
    if let Some(mut task) = in_flight {
        task.join().await;
    }
}

async fn convert(
    side: Side,
    amount: f64,
    sync: Arc<PairSynchronizer>,
    events: mpsc::UnboundedSender<SyncEvent>,
) {
    let event = match sync.edit(side, amount).await {
        Ok(EditOutcome::Applied(pair)) => SyncEvent::Applied { side, pair },
        Ok(EditOutcome::Superseded) => SyncEvent::Superseded { side },
        Err(error) => SyncEvent::Failed { side, error },
    };
    // The receiver may already be gone during teardown.
    let _ = events.send(event);
}
