// crates/kvstore-core/src/conformance.rs
// ============================================================================
// Module: Store Conformance Suite
// Description: Backend-independent checks of the store contract.
// Purpose: Let every backend prove identical set/get/delete semantics.
// Dependencies: crate::interfaces, serde, thiserror
// ============================================================================

//! ## Overview
//! [`check_store`] drives a store through the contract: empty-key rejection,
//! not-found reporting, round trips for structured and scalar values,
//! overwrites, and idempotent deletes. It returns the first violation instead
//! of panicking so callers decide how to report it.
//!
//! The suite writes keys under the `conformance:` prefix and deletes them
//! before returning successfully.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::interfaces::Store;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A contract violation found by [`check_store`].
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The store returned an error where success was expected.
    #[error("store conformance: {step} failed: {source}")]
    Store {
        /// Step that failed.
        step: &'static str,
        /// Error returned by the store.
        source: StoreError,
    },
    /// The store succeeded but behaved incorrectly.
    #[error("store conformance: {0}")]
    Violation(String),
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Structured value written by the suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Profile {
    /// Display name.
    name: String,
    /// Visit counter.
    visits: u32,
    /// Free-form labels.
    labels: Vec<String>,
}

/// Key used for structured values.
const PROFILE_KEY: &str = "conformance:profile";
/// Key used for scalar values.
const SCALAR_KEY: &str = "conformance:scalar";
/// Key that is never written.
const MISSING_KEY: &str = "conformance:missing";

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Runs the store contract checks against `store`.
///
/// # Errors
///
/// Returns [`ConformanceError`] describing the first violated expectation.
pub fn check_store<S>(store: &S) -> Result<(), ConformanceError>
where
    S: Store,
{
    check_empty_key_rejected(store)?;
    check_missing_key(store)?;
    check_profile_lifecycle(store)?;
    check_scalar_values(store)?;
    Ok(())
}

/// Empty keys fail validation on every operation.
fn check_empty_key_rejected<S: Store>(store: &S) -> Result<(), ConformanceError> {
    let mut target = String::new();
    expect_validation("set with empty key", store.set("", "value"))?;
    expect_validation("get with empty key", store.get("", &mut target))?;
    expect_validation("delete with empty key", store.delete(""))?;
    Ok(())
}

/// Missing keys are reported as not found and leave the target untouched.
fn check_missing_key<S: Store>(store: &S) -> Result<(), ConformanceError> {
    let mut target = "untouched".to_string();
    let found = step("get missing key", store.get(MISSING_KEY, &mut target))?;
    ensure(!found, "get on a missing key reported found")?;
    ensure(target == "untouched", "get on a missing key modified the target")?;
    step("delete missing key", store.delete(MISSING_KEY))?;
    step("delete missing key twice", store.delete(MISSING_KEY))?;
    Ok(())
}

/// Structured values round trip, overwrite, and delete.
fn check_profile_lifecycle<S: Store>(store: &S) -> Result<(), ConformanceError> {
    let first = Profile {
        name: "Ann".to_string(),
        visits: 1,
        labels: vec!["admin".to_string()],
    };
    let second = Profile {
        name: "Ann".to_string(),
        visits: 2,
        labels: Vec::new(),
    };

    step("set profile", store.set(PROFILE_KEY, &first))?;
    let mut loaded = Profile::default();
    let found = step("get profile", store.get(PROFILE_KEY, &mut loaded))?;
    ensure(found, "stored profile was not found")?;
    ensure(loaded == first, "stored profile did not round trip")?;

    step("overwrite profile", store.set(PROFILE_KEY, &second))?;
    let found = step("get overwritten profile", store.get(PROFILE_KEY, &mut loaded))?;
    ensure(found, "overwritten profile was not found")?;
    ensure(loaded == second, "get did not return the most recent value")?;

    step("delete profile", store.delete(PROFILE_KEY))?;
    let mut after_delete = Profile::default();
    let found = step("get deleted profile", store.get(PROFILE_KEY, &mut after_delete))?;
    ensure(!found, "deleted profile was still found")?;
    ensure(after_delete == Profile::default(), "get on a deleted key modified the target")?;
    step("delete profile twice", store.delete(PROFILE_KEY))?;
    Ok(())
}

/// Scalar and sequence values round trip.
fn check_scalar_values<S: Store>(store: &S) -> Result<(), ConformanceError> {
    step("set string", store.set(SCALAR_KEY, "hello"))?;
    let mut text = String::new();
    step("get string", store.get(SCALAR_KEY, &mut text))?;
    ensure(text == "hello", "string value did not round trip")?;

    step("set integer", store.set(SCALAR_KEY, &-42_i64))?;
    let mut number = 0_i64;
    step("get integer", store.get(SCALAR_KEY, &mut number))?;
    ensure(number == -42, "integer value did not round trip")?;

    let bytes: Vec<u8> = vec![0, 1, 254, 255];
    step("set byte sequence", store.set(SCALAR_KEY, &bytes))?;
    let mut loaded: Vec<u8> = Vec::new();
    step("get byte sequence", store.get(SCALAR_KEY, &mut loaded))?;
    ensure(loaded == bytes, "byte sequence did not round trip")?;

    step("delete scalar", store.delete(SCALAR_KEY))?;
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a store result to a conformance result for `name`.
fn step<T>(name: &'static str, result: Result<T, StoreError>) -> Result<T, ConformanceError> {
    result.map_err(|source| ConformanceError::Store {
        step: name,
        source,
    })
}

/// Fails with `message` unless `condition` holds.
fn ensure(condition: bool, message: &str) -> Result<(), ConformanceError> {
    if condition {
        Ok(())
    } else {
        Err(ConformanceError::Violation(message.to_string()))
    }
}

/// Requires a validation error from `result`.
fn expect_validation<T>(
    name: &'static str,
    result: Result<T, StoreError>,
) -> Result<(), ConformanceError> {
    match result {
        Err(StoreError::Validation(_)) => Ok(()),
        Err(source) => Err(ConformanceError::Store {
            step: name,
            source,
        }),
        Ok(_) => Err(ConformanceError::Violation(format!("{name} was accepted"))),
    }
}
