use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use super::{obra_schema, record};
use crate::resolver::{Context, ResolveOutcome};
use crate::scheduler::RecomputeScheduler;
use crate::test_port::TestPort;

const QUIET: Duration = Duration::from_millis(200);

fn spawn_scheduler(
    port: Arc<TestPort>,
) -> (RecomputeScheduler, mpsc::UnboundedReceiver<ResolveOutcome>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let scheduler = RecomputeScheduler::spawn(
        Arc::new(obra_schema()),
        port,
        Context::new(),
        QUIET,
        move |outcome| {
            let _ = tx.send(outcome);
        },
    );
    (scheduler, rx)
}

async fn settle() {
    // Let the worker drain its channel and (with the clock paused) run any
    // due timer before we assert.
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_coalesce_into_one_pass_with_last_snapshot() {
    let port = Arc::new(TestPort::new().with_result("pedidos", "id", 0.0));
    let (scheduler, mut outcomes) = spawn_scheduler(Arc::clone(&port));

    for cantidad in 1..=3 {
        scheduler.record_edited(record(
            json!({ "id": "X", "precio": 10, "cantidad": cantidad }),
        ));
    }

    let outcome = outcomes.recv().await.unwrap();
    // One pass, computed from the last edit's snapshot.
    assert_eq!(outcome.record.get("subtotal"), Some(&json!(30.0)));

    tokio::time::sleep(QUIET * 4).await;
    settle().await;
    assert!(outcomes.try_recv().is_err());
    assert_eq!(port.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn edits_separated_by_quiet_periods_trigger_separate_passes() {
    let port = Arc::new(TestPort::new().with_result("pedidos", "id", 0.0));
    let (scheduler, mut outcomes) = spawn_scheduler(Arc::clone(&port));

    scheduler.record_edited(record(json!({ "id": "X", "precio": 1, "cantidad": 1 })));
    let first = outcomes.recv().await.unwrap();
    assert_eq!(first.record.get("subtotal"), Some(&json!(1.0)));

    scheduler.record_edited(record(json!({ "id": "X", "precio": 2, "cantidad": 2 })));
    let second = outcomes.recv().await.unwrap();
    assert_eq!(second.record.get("subtotal"), Some(&json!(4.0)));

    assert_eq!(port.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_the_pending_pass() {
    let port = Arc::new(TestPort::new().with_result("pedidos", "id", 0.0));
    let (scheduler, mut outcomes) = spawn_scheduler(Arc::clone(&port));

    scheduler.record_edited(record(json!({ "id": "old", "precio": 9, "cantidad": 9 })));
    scheduler.cancel_pending();
    settle().await;
    tokio::time::sleep(QUIET * 4).await;
    settle().await;
    assert!(outcomes.try_recv().is_err());
    assert!(port.calls().is_empty());

    // The scheduler stays usable after a cancel.
    scheduler.record_edited(record(json!({ "id": "new", "precio": 2, "cantidad": 3 })));
    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.record.get("subtotal"), Some(&json!(6.0)));
    assert_eq!(port.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_stops_the_worker() {
    let port = Arc::new(TestPort::new().with_result("pedidos", "id", 0.0));
    let (scheduler, mut outcomes) = spawn_scheduler(Arc::clone(&port));

    scheduler.record_edited(record(json!({ "id": "X", "precio": 1, "cantidad": 1 })));
    drop(scheduler);
    settle().await;
    tokio::time::sleep(QUIET * 4).await;
    settle().await;

    // The pending pass never ran and the channel is closed.
    assert!(outcomes.recv().await.is_none());
    assert!(port.calls().is_empty());
}
