// Integration tests for concurrent repository access through one store

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hoard_core::model::{Category, Contract, User, MODULE_CONTRACTS};
use hoard_store::keys::KeyFamily;
use hoard_store::Store;
use std::sync::Arc;
use std::thread;

#[test]
fn test_parallel_creates_keep_index_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let config = hoard_store::StoreConfig {
        db_path: dir.path().join("hoard.db"),
        gc_interval_secs: 1,
        ..Default::default()
    };
    let store = Arc::new(Store::open(&config).unwrap());
    let category = Category::new("Shared");
    store
        .create_category("alice", MODULE_CONTRACTS, &category)
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            let category_id = category.id;
            thread::spawn(move || {
                for n in 0..10 {
                    let contract =
                        Contract::new(category_id, format!("t{}-{}", t, n), "2024-01-01");
                    store.create_contract("alice", &contract).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list_contracts("alice").unwrap().len(), 80);
    assert_eq!(
        store
            .list_contracts_by_category("alice", &category.id)
            .unwrap()
            .len(),
        80
    );
    assert_eq!(store.census().unwrap().count(KeyFamily::ContractIndex), 80);
}

#[test]
fn test_racing_signups_admit_one_email_owner() {
    let store = Arc::new(Store::open_in_memory().unwrap());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.create_user(&User::new("race@b.com", "h")).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(store.list_users().unwrap().len(), 1);
}

#[test]
fn test_cascade_and_reads_interleave_safely() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let categories: Vec<Category> = (0..4).map(|i| Category::new(format!("c{}", i))).collect();
    for category in &categories {
        store
            .create_category("alice", MODULE_CONTRACTS, category)
            .unwrap();
        for n in 0..5 {
            let contract = Contract::new(category.id, format!("k{}", n), "2024-01-01");
            store.create_contract("alice", &contract).unwrap();
        }
    }

    let reader = {
        let store = Arc::clone(&store);
        let ids: Vec<_> = categories.iter().map(|c| c.id).collect();
        thread::spawn(move || {
            for _ in 0..50 {
                for id in &ids {
                    // Each category is either fully present or fully gone
                    let n = store.list_contracts_by_category("alice", id).unwrap().len();
                    assert!(n == 0 || n == 5, "observed partial cascade: {}", n);
                }
            }
        })
    };

    for category in &categories {
        store
            .delete_category("alice", MODULE_CONTRACTS, &category.id)
            .unwrap();
    }
    reader.join().unwrap();

    assert!(store.list_contracts("alice").unwrap().is_empty());
}
