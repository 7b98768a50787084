// crates/kvstore-core/tests/memory_store.rs
// ============================================================================
// Module: In-Memory Store Tests
// Description: Contract tests for the in-memory store implementation.
// Purpose: Validate set/get/delete semantics without an external backend.
// Dependencies: kvstore-core
// ============================================================================
//! ## Overview
//! Runs the conformance suite against both codecs and pins down the
//! not-found, overwrite, and decode-failure behavior of the in-memory store.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use kvstore_core::BincodeCodec;
use kvstore_core::CodecError;
use kvstore_core::InMemoryStore;
use kvstore_core::Store;
use kvstore_core::StoreError;
use kvstore_core::ValidationError;
use kvstore_core::check_store;

/// Verifies the JSON-backed store satisfies the contract.
#[test]
fn memory_store_passes_conformance_with_json() {
    let store = InMemoryStore::new();
    check_store(&store).expect("conformance");
    assert!(store.is_empty().expect("is_empty"));
}

/// Verifies the bincode-backed store satisfies the contract.
#[test]
fn memory_store_passes_conformance_with_bincode() {
    let store = InMemoryStore::with_codec(BincodeCodec);
    check_store(&store).expect("conformance");
}

/// Verifies the user scenario from set through delete.
#[test]
fn memory_store_user_scenario() {
    let store = InMemoryStore::new();
    let mut user = BTreeMap::new();
    user.insert("name".to_string(), "Ann".to_string());
    store.set("user:1", &user).expect("set");

    let mut target: BTreeMap<String, String> = BTreeMap::new();
    assert!(store.get("user:1", &mut target).expect("get"));
    assert_eq!(target, user);

    store.delete("user:1").expect("delete");
    assert!(!store.get("user:1", &mut target).expect("get after delete"));
}

/// Verifies overwrites keep one entry per key.
#[test]
fn memory_store_overwrite_keeps_single_entry() {
    let store = InMemoryStore::new();
    store.set("k", &1_u32).expect("set v1");
    store.set("k", &2_u32).expect("set v2");
    let mut value = 0_u32;
    assert!(store.get("k", &mut value).expect("get"));
    assert_eq!(value, 2);
    assert_eq!(store.len().expect("len"), 1);
}

/// Verifies decode failures surface as codec errors and leave the target alone.
#[test]
fn memory_store_decode_failure_is_codec_error() {
    let store = InMemoryStore::new();
    store.set("k", "not a number").expect("set");
    let mut value = 7_u32;
    let result = store.get("k", &mut value);
    assert!(matches!(result, Err(StoreError::Codec(CodecError::Json(_)))));
    assert_eq!(value, 7);
}

/// Verifies empty keys fail with the validation variant.
#[test]
fn memory_store_rejects_empty_key() {
    let store = InMemoryStore::new();
    let result = store.set("", &1_u8);
    assert!(matches!(result, Err(StoreError::Validation(ValidationError::EmptyKey))));
    assert!(store.is_empty().expect("is_empty"));
}

/// Verifies clones share state across threads with last-write-wins.
#[test]
fn memory_store_concurrent_writers_share_state() {
    let store = Arc::new(InMemoryStore::new());
    let handles: Vec<_> = (0..8_u32)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.set("shared", &worker))
        })
        .collect();
    for handle in handles {
        handle.join().expect("join").expect("set");
    }
    let mut value = u32::MAX;
    assert!(store.get("shared", &mut value).expect("get"));
    assert!(value < 8);
    assert_eq!(store.len().expect("len"), 1);
}

/// Verifies close consumes the store without error.
#[test]
fn memory_store_close_succeeds() {
    let store = InMemoryStore::new();
    store.set("k", "v").expect("set");
    store.close().expect("close");
}
