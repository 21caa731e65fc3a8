//! Transaction control-flow scenarios: rollback, halt, and error propagation

use super::test_utils::{FailingReceiver, RecordingReceiver};
use serde_json::json;
use upshot::{attrs, Error, Outcome, Transaction};

#[test]
fn test_rollback_scenario() {
    let mut receiver = RecordingReceiver::default();
    let outcome = Transaction::new(&mut receiver, attrs! {})
        .call(|tx| {
            tx.capture(attrs! {}, || true);
            tx.rollback()?;
            unreachable!("rollback must stop the block");
        })
        .unwrap();

    assert!(outcome.is_rolled_back());
    assert!(!outcome.is_halted());
    // The receiver observed an abort, but `call` did not raise.
    assert_eq!(receiver.begun, 1);
    assert_eq!(receiver.aborted, 1);
    assert_eq!(receiver.committed, 0);
    // Captures made before the rollback are retained.
    assert_eq!(outcome.children().len(), 1);
}

#[test]
fn test_halt_scenario() {
    let mut receiver = RecordingReceiver::default();
    let outcome = Transaction::new(&mut receiver, attrs! {})
        .call(|tx| {
            tx.capture(attrs! { "step" => "first" }, || true);
            tx.halt()?;
            tx.capture(attrs! { "step" => "second" }, || true);
            Ok(())
        })
        .unwrap();

    // Only the first capture landed; the receiver committed normally.
    assert_eq!(outcome.children().len(), 1);
    assert_eq!(outcome.children()[0].get("step"), Some(&json!("first")));
    assert!(outcome.is_halted());
    assert!(!outcome.is_rolled_back());
    assert_eq!(receiver.committed, 1);
    assert_eq!(receiver.aborted, 0);
}

#[test]
fn test_bang_capture_failure_propagates_out_of_call() {
    let mut receiver = RecordingReceiver::default();
    let result = Transaction::new(&mut receiver, attrs! {}).call(|tx| {
        tx.try_capture(attrs! { "description" => "insert failed" }, || {
            Outcome::failure(attrs! {})
        })?;
        Ok(())
    });

    // The caller receives the error, not a returned outcome, and the
    // receiver aborted its unit of work.
    match result {
        Err(Error::Capture(err)) => assert_eq!(err.message, "insert failed"),
        other => panic!("expected capture error, got {other:?}"),
    }
    assert_eq!(receiver.aborted, 1);
    assert_eq!(receiver.committed, 0);
}

#[test]
fn test_receiver_failures_propagate() {
    let result = Transaction::new(FailingReceiver, attrs! {}).call(|_tx| Ok(()));
    match result {
        Err(Error::Receiver(message)) => assert_eq!(message, "commit refused"),
        other => panic!("expected receiver error, got {other:?}"),
    }
}

#[test]
fn test_transaction_delegates_outcome_operations() {
    let mut tx = Transaction::new(
        RecordingReceiver::default(),
        attrs! { "value" => 1, "description" => "batch" },
    );

    assert!(tx.is_success());
    assert_eq!(tx.get("value"), Some(&json!(1)));
    assert_eq!(tx.description(), Some("batch"));
    // Bookkeeping attributes stay out of public enumeration.
    assert_eq!(tx.attribute_names(), vec!["value", "description"]);

    tx.set(attrs! { "value" => 2 });
    assert_eq!(tx.get("value"), Some(&json!(2)));
}

#[test]
fn test_nested_transaction_outcome_captured_by_parent() {
    let parent_outcome = Transaction::run(RecordingReceiver::default(), attrs! {}, |tx| {
        let nested = Transaction::run(RecordingReceiver::default(), attrs! {}, |inner| {
            inner.capture(attrs! { "value" => 10 }, || true);
            inner.rollback()?;
            Ok(())
        })?;

        // The nested transaction rolled back but returned normally; its
        // outcome is capturable like any other.
        tx.capture_for(nested, attrs! { "description" => "nested batch" });
        Ok(())
    })
    .unwrap();

    assert!(parent_outcome.is_success());
    let nested = &parent_outcome.children()[0];
    assert!(nested.is_rolled_back());
    assert_eq!(nested.get_for_children("value"), json!([10]));
}

#[test]
fn test_transaction_outcome_supports_aggregation() {
    let mut receiver = RecordingReceiver::default();
    let outcome = Transaction::new(&mut receiver, attrs! {})
        .call(|tx| {
            tx.capture(attrs! { "value" => json!({"count": 1}) }, || true);
            tx.capture(attrs! { "value" => json!({"count": 2}) }, || true);
            Ok(())
        })
        .unwrap();

    assert_eq!(
        outcome.get_for_children("value"),
        json!({"count": [1, 2]})
    );
}
