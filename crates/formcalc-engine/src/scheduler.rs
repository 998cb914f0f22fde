//! Debounced recompute scheduling.
//!
//! The scheduler owns a single worker task per form session. Every record
//! edit restarts a quiet-interval timer with the latest snapshot; when the
//! timer fires, the worker runs exactly one resolve pass and hands the
//! outcome to the caller's callback. At most one timer is pending and at
//! most one pass is in flight at a time; edits arriving mid-pass queue up
//! and open the next debounce window afterwards. An in-flight pass is
//! never aborted — a later pass with fresher data simply supersedes its
//! result (last-write-wins on the record snapshot).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::record::Record;
use crate::resolver::{self, Context, ResolveOutcome};
use crate::schema::Schema;
use crate::traits::AggregationPort;

/// Quiet interval applied by [`RecomputeScheduler::spawn_default`].
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(200);

enum Message {
    Edited(Record),
    Cancel,
}

/// Debounced, cancellable trigger for resolve passes.
pub struct RecomputeScheduler {
    tx: mpsc::UnboundedSender<Message>,
    worker: JoinHandle<()>,
}

impl RecomputeScheduler {
    /// Spawn a scheduler with the default quiet interval.
    pub fn spawn_default<F>(
        schema: Arc<Schema>,
        port: Arc<dyn AggregationPort>,
        context: Context,
        on_resolved: F,
    ) -> Self
    where
        F: FnMut(ResolveOutcome) + Send + 'static,
    {
        Self::spawn(schema, port, context, DEFAULT_QUIET_INTERVAL, on_resolved)
    }

    /// Spawn the worker task. `on_resolved` runs on the worker after each
    /// completed pass.
    pub fn spawn<F>(
        schema: Arc<Schema>,
        port: Arc<dyn AggregationPort>,
        context: Context,
        quiet: Duration,
        mut on_resolved: F,
    ) -> Self
    where
        F: FnMut(ResolveOutcome) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            'idle: while let Some(msg) = rx.recv().await {
                let mut latest = match msg {
                    Message::Edited(record) => record,
                    Message::Cancel => continue 'idle,
                };

                // Debounce window: later edits replace the snapshot and
                // restart the timer; a cancel abandons the window.
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(quiet) => break,
                        msg = rx.recv() => match msg {
                            Some(Message::Edited(record)) => latest = record,
                            Some(Message::Cancel) => continue 'idle,
                            None => return,
                        },
                    }
                }

                tracing::debug!("quiet interval elapsed; starting resolve pass");
                let outcome = resolver::resolve(&schema, &latest, port.as_ref(), &context).await;
                on_resolved(outcome);
            }
        });

        Self { tx, worker }
    }

    /// Notify the scheduler of a record edit. Restarts the quiet timer
    /// with this snapshot.
    pub fn record_edited(&self, snapshot: Record) {
        let _ = self.tx.send(Message::Edited(snapshot));
    }

    /// Drop any pending (not yet fired) recompute without running it.
    /// Call when the record or schema identity changes under the session.
    pub fn cancel_pending(&self) {
        let _ = self.tx.send(Message::Cancel);
    }
}

impl Drop for RecomputeScheduler {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
