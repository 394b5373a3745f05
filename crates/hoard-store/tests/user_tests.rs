// Integration tests for user records and email uniqueness

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hoard_core::errors::HxErrorKind;
use hoard_core::model::User;
use hoard_store::keys::KeyFamily;
use hoard_store::Store;

fn setup_store() -> Store {
    Store::open_in_memory().expect("Failed to open in-memory store")
}

#[test]
fn test_duplicate_email_is_conflict() {
    let store = setup_store();
    let first = User::new("a@b.com", "hash-1");
    store.create_user(&first).unwrap();

    let second = User::new("a@b.com", "hash-2");
    let err = store.create_user(&second).unwrap_err();
    assert_eq!(err.kind(), HxErrorKind::Conflict);

    // First user unchanged, second never written
    assert_eq!(store.get_user_by_email("a@b.com").unwrap(), first);
    assert!(store
        .get_user_by_id(&second.user_id())
        .unwrap_err()
        .is_not_found());
    assert_eq!(store.list_users().unwrap(), vec![first]);
}

#[test]
fn test_email_is_case_sensitive() {
    let store = setup_store();
    store.create_user(&User::new("a@b.com", "h")).unwrap();
    store.create_user(&User::new("A@B.com", "h")).unwrap();
    assert_eq!(store.list_users().unwrap().len(), 2);
}

#[test]
fn test_list_users_ignores_email_lookups() {
    let store = setup_store();
    for email in ["x@example.com", "y@example.com", "z@example.com"] {
        store.create_user(&User::new(email, "h")).unwrap();
    }

    let users = store.list_users().unwrap();
    assert_eq!(users.len(), 3);
    let census = store.census().unwrap();
    assert_eq!(census.count(KeyFamily::User), 3);
    assert_eq!(census.count(KeyFamily::UserEmail), 3);
}

#[test]
fn test_update_user_moves_email_lookup() {
    let store = setup_store();
    let mut user = User::new("old@b.com", "h");
    store.create_user(&user).unwrap();

    user.email = "new@b.com".to_string();
    store.update_user(&user).unwrap();

    assert_eq!(store.get_user_by_email("new@b.com").unwrap(), user);
    assert!(store
        .get_user_by_email("old@b.com")
        .unwrap_err()
        .is_not_found());

    // The old address is free again
    store.create_user(&User::new("old@b.com", "h")).unwrap();
}

#[test]
fn test_update_user_to_taken_email_is_conflict() {
    let store = setup_store();
    let alice = User::new("alice@b.com", "h");
    let mut bob = User::new("bob@b.com", "h");
    store.create_user(&alice).unwrap();
    store.create_user(&bob).unwrap();

    let original = bob.clone();
    bob.email = "alice@b.com".to_string();
    let err = store.update_user(&bob).unwrap_err();
    assert_eq!(err.kind(), HxErrorKind::Conflict);

    // Rolled back entirely
    assert_eq!(store.get_user_by_id(&bob.user_id()).unwrap(), original);
    assert_eq!(store.get_user_by_email("bob@b.com").unwrap(), original);
    assert_eq!(store.get_user_by_email("alice@b.com").unwrap(), alice);
}

#[test]
fn test_update_unknown_user_is_not_found() {
    let store = setup_store();
    let ghost = User::new("ghost@b.com", "h");
    assert!(store.update_user(&ghost).unwrap_err().is_not_found());
    assert!(store
        .get_user_by_email("ghost@b.com")
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_password_hash_is_persisted() {
    let store = setup_store();
    let user = User::new("a@b.com", "$argon2id$secret");
    store.create_user(&user).unwrap();

    let loaded = store.get_user_by_id(&user.user_id()).unwrap();
    assert_eq!(loaded.password_hash.expose(), "$argon2id$secret");
}

#[test]
fn test_empty_email_is_not_found() {
    let store = setup_store();
    store.create_user(&User::new("a@b.com", "h")).unwrap();

    let err = store.get_user_by_email("").unwrap_err();
    assert_eq!(err.kind(), HxErrorKind::NotFound);
}
