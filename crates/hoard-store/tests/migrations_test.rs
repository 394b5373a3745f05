// Integration tests for the migration runner and the built-in migrations

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hoard_core::errors::HxErrorKind;
use hoard_core::model::{BillingInterval, Category, MODULE_CONTRACTS};
use hoard_store::keys::SCHEMA_VERSION_KEY;
use hoard_store::kv::{KvEngine, KvRead};
use hoard_store::migrations::{self, read_version, run_all, Migration, CURRENT_VERSION};
use hoard_store::Store;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

type Dump = Vec<(Vec<u8>, Vec<u8>)>;

fn setup_engine() -> KvEngine {
    KvEngine::open_in_memory().expect("Failed to open in-memory engine")
}

fn dump(engine: &KvEngine) -> Dump {
    engine.view(|txn| txn.scan_prefix(b"")).unwrap()
}

fn version(engine: &KvEngine) -> u64 {
    engine.view(|txn| read_version(txn)).unwrap()
}

#[test]
fn test_empty_store_runs_everything() {
    let engine = setup_engine();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let migrations = vec![Migration::new(1, "test", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })];

    assert_eq!(run_all(&engine, &migrations).unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(version(&engine), 1);
}

#[test]
fn test_applies_in_ascending_order() {
    let engine = setup_engine();
    let order = Arc::new(Mutex::new(Vec::new()));
    let migrations: Vec<Migration> = (1..=3)
        .map(|v| {
            let order = Arc::clone(&order);
            Migration::new(v, format!("step {}", v), move |_| {
                order.lock().unwrap().push(v);
                Ok(())
            })
        })
        .collect();

    run_all(&engine, &migrations).unwrap();

    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(version(&engine), 3);
}

#[test]
fn test_skips_already_applied() {
    let engine = setup_engine();
    engine
        .update(|txn| migrations::write_version(txn, 1))
        .unwrap();

    let called = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&called);
    let migrations = vec![Migration::new(1, "should be skipped", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })];

    run_all(&engine, &migrations).unwrap();
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[test]
fn test_second_run_is_a_no_op() {
    let engine = setup_engine();
    engine
        .update(|txn| {
            txn.set(
                b"u/alice/con/c1",
                br#"{"name":"Gym","pricePerMonth":30,"startDate":"2024-01-01"}"#,
            )?;
            txn.set(b"u/alice/cat/k1", br#"{"name":"Sport"}"#)
        })
        .unwrap();

    let registry = migrations::all();
    run_all(&engine, &registry).unwrap();
    let after_first = dump(&engine);

    let calls = Arc::new(AtomicUsize::new(0));
    let registry: Vec<Migration> = (1..=CURRENT_VERSION)
        .map(|v| {
            let counter = Arc::clone(&calls);
            Migration::new(v, "counting", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
        .collect();

    assert_eq!(run_all(&engine, &registry).unwrap(), CURRENT_VERSION);
    assert_eq!(dump(&engine), after_first);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failure_stops_at_last_success() {
    let engine = setup_engine();
    let v3_called = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&v3_called);

    let migrations = vec![
        Migration::new(1, "succeeds", |txn| txn.set(b"u/alice/settings", b"{}")),
        Migration::new(2, "fails", |txn| {
            txn.set(b"u/alice/partial", b"half-done")?;
            Err(hoard_core::errors::HxError::new(HxErrorKind::Internal).with_message("boom"))
        }),
        Migration::new(3, "never reached", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    ];

    let err = run_all(&engine, &migrations).unwrap_err();
    assert_eq!(err.kind(), HxErrorKind::Migration);
    assert!(err.message().contains("Migration 2 (fails) failed"));
    assert!(err.message().contains("boom"));

    assert_eq!(version(&engine), 1);
    assert_eq!(v3_called.load(Ordering::SeqCst), 0);
    engine
        .view(|txn| {
            assert!(txn.contains(b"u/alice/settings")?);
            assert!(!txn.contains(b"u/alice/partial")?);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_retry_resumes_after_last_success() {
    let engine = setup_engine();
    let failing = vec![
        Migration::new(1, "one", |txn| txn.set(b"one", b"")),
        Migration::new(2, "two", |_| {
            Err(hoard_core::errors::HxError::new(HxErrorKind::Internal))
        }),
    ];
    assert!(run_all(&engine, &failing).is_err());

    let v1_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&v1_calls);
    let fixed = vec![
        Migration::new(1, "one", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
        Migration::new(2, "two", |txn| txn.set(b"two", b"")),
    ];
    assert_eq!(run_all(&engine, &fixed).unwrap(), 2);
    assert_eq!(v1_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_corrupt_marker_fails_startup() {
    let engine = setup_engine();
    engine
        .update(|txn| txn.set(SCHEMA_VERSION_KEY, b"\x01"))
        .unwrap();

    let err = Store::open_with(engine, &migrations::all(), None).unwrap_err();
    assert_eq!(err.kind(), HxErrorKind::Persistence);
}

#[test]
fn test_v1_renames_price_on_contracts_only() {
    let engine = setup_engine();
    engine
        .update(|txn| {
            txn.set(
                b"u/alice/con/c1",
                br#"{"name":"Gym","pricePerMonth":29.9,"startDate":"2024-01-01"}"#,
            )?;
            txn.set(
                b"u/alice/con/c2",
                br#"{"name":"Power","price":80,"billingInterval":"yearly"}"#,
            )?;
            // Same field name under a purchase key must be left alone
            txn.set(b"u/alice/pur/p1", br#"{"pricePerMonth":5}"#)
        })
        .unwrap();
    let untouched = engine.view(|txn| txn.get(b"u/alice/con/c2")).unwrap();

    run_all(&engine, &migrations::all()).unwrap();

    let doc: serde_json::Value = serde_json::from_slice(
        &engine.view(|txn| txn.get(b"u/alice/con/c1")).unwrap().unwrap(),
    )
    .unwrap();
    assert_eq!(doc["price"], 29.9);
    assert_eq!(doc["billingInterval"], "monthly");
    assert!(doc.get("pricePerMonth").is_none());

    assert_eq!(engine.view(|txn| txn.get(b"u/alice/con/c2")).unwrap(), untouched);
    assert_eq!(
        engine.view(|txn| txn.get(b"u/alice/pur/p1")).unwrap(),
        Some(br#"{"pricePerMonth":5}"#.to_vec())
    );
}

#[test]
fn test_legacy_store_is_readable_after_open() {
    let engine = setup_engine();
    let category_id = Uuid::new_v4();
    let contract_id = Uuid::new_v4();
    let category = Category::new("Legacy");
    let legacy_category = serde_json::to_vec(&Category {
        id: category_id,
        ..category
    })
    .unwrap();
    let legacy_contract = serde_json::json!({
        "id": contract_id,
        "categoryId": category_id,
        "name": "Old phone plan",
        "pricePerMonth": 19.99,
        "startDate": "2019-06-01",
        "createdAt": "2019-06-01T00:00:00Z",
        "updatedAt": "2019-06-01T00:00:00Z"
    });

    engine
        .update(|txn| {
            txn.set(
                format!("u/alice/cat/{}", category_id).as_bytes(),
                &legacy_category,
            )?;
            txn.set(
                format!("u/alice/con/{}", contract_id).as_bytes(),
                &serde_json::to_vec(&legacy_contract).unwrap(),
            )
        })
        .unwrap();

    let store = Store::open_with(engine, &migrations::all(), None).unwrap();
    assert_eq!(store.schema_version().unwrap(), CURRENT_VERSION);

    let categories = store.list_categories("alice", MODULE_CONTRACTS).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, category_id);

    let contract = store.get_contract("alice", &contract_id).unwrap();
    assert_eq!(contract.price, Some(19.99));
    assert_eq!(contract.billing_interval, BillingInterval::Monthly);
}

#[test]
fn test_reopen_does_not_rerun_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hoard.db");

    let store = Store::open_with(KvEngine::open(&path).unwrap(), &migrations::all(), None).unwrap();
    store.close();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = migrations::all();
    registry.push(Migration::new(CURRENT_VERSION + 1, "next", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    let store = Store::open_with(KvEngine::open(&path).unwrap(), &registry, None).unwrap();
    assert_eq!(store.schema_version().unwrap(), CURRENT_VERSION + 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    store.close();

    let store = Store::open_with(KvEngine::open(&path).unwrap(), &registry, None).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    store.close();
}
