// crates/kvstore-core/src/memory.rs
// ============================================================================
// Module: In-Memory Store
// Description: Mutex-guarded map implementation of the store contract.
// Purpose: Provide a deterministic store for tests and demos without a backend.
// Dependencies: crate::{codec, interfaces, validation}
// ============================================================================

//! ## Overview
//! [`InMemoryStore`] keeps codec-encoded payloads in a `BTreeMap`. It runs the
//! same validation and codec path as a database backend, which makes it a
//! drop-in substitute in tests. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::Codec;
use crate::codec::JsonCodec;
use crate::interfaces::Store;
use crate::interfaces::StoreError;
use crate::validation::check_key;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory key-value store for tests and examples.
///
/// Clones share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore<C = JsonCodec> {
    /// Encoded payloads keyed by store key.
    entries: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    /// Codec used for values.
    codec: C,
}

impl InMemoryStore<JsonCodec> {
    /// Creates an empty store using the JSON codec.
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl<C> InMemoryStore<C> {
    /// Creates an empty store using `codec`.
    #[must_use]
    pub fn with_codec(codec: C) -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
            codec,
        }
    }

    /// Returns the number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the map lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// Returns true when no keys are stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the map lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    /// Locks the entry map.
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::backend("in-memory store mutex poisoned"))
    }
}

impl<C> Store for InMemoryStore<C>
where
    C: Codec,
{
    fn set<V>(&self, key: &str, value: &V) -> Result<(), StoreError>
    where
        V: Serialize + ?Sized,
    {
        check_key(key)?;
        let data = self.codec.marshal(value)?;
        self.lock()?.insert(key.to_string(), data);
        Ok(())
    }

    fn get<V>(&self, key: &str, target: &mut V) -> Result<bool, StoreError>
    where
        V: DeserializeOwned,
    {
        check_key(key)?;
        let data = self.lock()?.get(key).cloned();
        let Some(data) = data else {
            return Ok(false);
        };
        *target = self.codec.unmarshal(&data)?;
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        Ok(())
    }
}
