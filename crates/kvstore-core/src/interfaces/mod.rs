// crates/kvstore-core/src/interfaces/mod.rs
// ============================================================================
// Module: KV Store Interfaces
// Description: Backend-agnostic store contract and its error taxonomy.
// Purpose: Define the surface applications program against instead of a backend.
// Dependencies: crate::codec, serde, thiserror
// ============================================================================

//! ## Overview
//! The [`Store`] trait is the only thing application code needs to know about
//! persistence. Implementations must reject empty keys before touching their
//! backend and must report a missing key as `Ok(false)` from [`Store::get`]
//! rather than as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::codec::CodecError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Boxed error type carried by backend failures.
pub type BackendError = Box<dyn StdError + Send + Sync + 'static>;

/// Input validation errors raised before any backend I/O.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The key is the empty string.
    #[error("the passed key is an empty string, which is invalid")]
    EmptyKey,
}

/// Store errors.
///
/// Codec and backend failures are transparent: their `Display` output is the
/// collaborator's own message, and the original error is kept in the variant
/// (see [`StoreError::backend_source`]).
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - A [`StoreError::Codec`] returned by [`Store::get`] means the key exists but
///   its payload could not be decoded into the requested type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key or value failed validation; no backend statement was issued.
    #[error("kv store invalid input: {0}")]
    Validation(#[from] ValidationError),
    /// Value encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Backend reported an error.
    #[error(transparent)]
    Backend(BackendError),
    /// Store configuration is invalid.
    #[error("kv store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Wraps a backend failure without altering it.
    pub fn backend<E>(error: E) -> Self
    where
        E: Into<BackendError>,
    {
        Self::Backend(error.into())
    }

    /// Returns the backend error when this is a backend failure.
    #[must_use]
    pub fn backend_source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Backend(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Key-value store contract.
///
/// Every operation is a single synchronous call. Implementations hold no
/// per-call state, so a store can be shared across threads whenever its
/// backend can.
pub trait Store {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty key,
    /// [`StoreError::Codec`] when encoding fails, and [`StoreError::Backend`]
    /// when the write fails.
    fn set<V>(&self, key: &str, value: &V) -> Result<(), StoreError>
    where
        V: Serialize + ?Sized;

    /// Loads the value stored under `key` into `target`.
    ///
    /// Returns `Ok(false)` and leaves `target` untouched when the key has no
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty key,
    /// [`StoreError::Backend`] when the lookup fails, and
    /// [`StoreError::Codec`] when the key exists but cannot be decoded.
    fn get<V>(&self, key: &str, target: &mut V) -> Result<bool, StoreError>
    where
        V: DeserializeOwned;

    /// Removes the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty key and
    /// [`StoreError::Backend`] when the delete fails.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Releases the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the backend fails to shut down.
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized;
}
