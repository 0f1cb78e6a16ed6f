//! End-to-end capsule scenarios driven the way an embedding runtime would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use caplet::{op_ids, Behavior, CapsuleError, CapsuleTable, HostRegistry};

// ============================================================================
// Host-surface scenarios
// ============================================================================

#[test]
fn add_capsule_end_to_end() {
    let mut registry = HostRegistry::new();
    let mut outputs = [0u64; 2];

    registry
        .call(op_ids::CAPSULE_MAKE, &[1, 5], &mut outputs)
        .unwrap();
    let token = outputs[0];

    let result = registry
        .call(op_ids::CAPSULE_INVOKE, &[token, 3], &mut outputs)
        .unwrap();
    assert_eq!(result, 8);

    registry
        .call(op_ids::CAPSULE_FREE, &[token], &mut outputs)
        .unwrap();
    assert_eq!(registry.table().live_count(), 0);
}

#[test]
fn multiply_capsule_end_to_end() {
    let mut registry = HostRegistry::new();
    let mut outputs = [0u64; 2];

    registry
        .call(op_ids::CAPSULE_MAKE, &[2, 5], &mut outputs)
        .unwrap();
    let token = outputs[0];

    let result = registry
        .call(op_ids::CAPSULE_INVOKE, &[token, 3], &mut outputs)
        .unwrap();
    assert_eq!(result, 15);

    registry
        .call(op_ids::CAPSULE_FREE, &[token], &mut outputs)
        .unwrap();
}

#[test]
fn bad_selector_is_rejected() {
    let mut registry = HostRegistry::new();
    let mut outputs = [0u64; 2];

    let err = registry
        .call(op_ids::CAPSULE_MAKE, &[99, 0], &mut outputs)
        .unwrap_err();
    assert!(matches!(err, CapsuleError::InvalidSelector(99)));
}

#[test]
fn many_capsules_interleaved() {
    let mut registry = HostRegistry::new();
    let mut outputs = [0u64; 2];
    let mut tokens = Vec::new();

    for payload in 0..50i64 {
        let selector = if payload % 2 == 0 { 1 } else { 2 };
        registry
            .call(
                op_ids::CAPSULE_MAKE,
                &[selector, payload as u64],
                &mut outputs,
            )
            .unwrap();
        tokens.push((outputs[0], selector, payload));
    }

    for &(token, selector, payload) in &tokens {
        let result = registry
            .call(op_ids::CAPSULE_INVOKE, &[token, 10], &mut outputs)
            .unwrap();
        let expected = if selector == 1 {
            payload + 10
        } else {
            payload * 10
        };
        assert_eq!(result, expected);
    }

    // Free every other capsule; the rest stay live and dispatchable.
    for &(token, _, _) in tokens.iter().step_by(2) {
        registry
            .call(op_ids::CAPSULE_FREE, &[token], &mut outputs)
            .unwrap();
    }
    assert_eq!(registry.table().live_count(), 25);

    let (token, _, payload) = tokens[1];
    let result = registry
        .call(op_ids::CAPSULE_INVOKE, &[token, 2], &mut outputs)
        .unwrap();
    assert_eq!(result, payload * 2);
}

// ============================================================================
// Table-level scenarios
// ============================================================================

#[test]
fn finalizers_run_exactly_once_across_paths() {
    let released = Arc::new(AtomicUsize::new(0));

    {
        let mut table = CapsuleTable::new();

        let counter = Arc::clone(&released);
        let explicit = table
            .create_with_finalizer(
                Behavior::Add,
                1,
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        let counter = Arc::clone(&released);
        table
            .create_with_finalizer(
                Behavior::Multiply,
                2,
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        // One explicit release, one left for teardown.
        table.release(explicit).unwrap();
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert!(table.release(explicit).is_err());
    }

    assert_eq!(released.load(Ordering::SeqCst), 2);
}

#[test]
fn budget_is_enforced_and_recovers() {
    let mut table = CapsuleTable::with_limit(4);
    let mut ids = Vec::new();

    for payload in 0..4 {
        ids.push(table.create(Behavior::Add, payload).unwrap());
    }
    assert!(matches!(
        table.create(Behavior::Add, 4),
        Err(CapsuleError::Exhausted { limit: 4 })
    ));

    table.release(ids[0]).unwrap();
    let id = table.create(Behavior::Add, 4).unwrap();
    assert_eq!(table.invoke(id, 1).unwrap(), 5);
}

#[test]
fn wraparound_is_the_documented_behavior() {
    let mut table = CapsuleTable::new();

    let add = table.create(Behavior::Add, i64::MAX).unwrap();
    assert_eq!(table.invoke(add, 1).unwrap(), i64::MIN);

    let mul = table.create(Behavior::Multiply, i64::MAX).unwrap();
    assert_eq!(table.invoke(mul, 2).unwrap(), -2);
}
