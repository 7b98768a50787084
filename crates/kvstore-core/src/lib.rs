// crates/kvstore-core/src/lib.rs
// ============================================================================
// Module: KV Store Core Library
// Description: Public API surface for the backend-agnostic key-value contract.
// Purpose: Expose the store trait, codecs, validation, and reference store.
// Dependencies: crate::{codec, conformance, interfaces, memory, validation}
// ============================================================================

//! ## Overview
//! KV store core defines the contract every key-value backend satisfies: values
//! are persisted under non-empty string keys through `set`, read back through
//! `get`, removed through `delete`, and the backend is released with `close`.
//! Value encoding is delegated to an injected [`Codec`], so backends only ever
//! see opaque byte payloads.
//!
//! Missing keys are not errors: `get` reports them as `false` and `delete`
//! treats them as a no-op.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod codec;
pub mod conformance;
pub mod interfaces;
pub mod memory;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::BincodeCodec;
pub use codec::Codec;
pub use codec::CodecError;
pub use codec::JsonCodec;
pub use conformance::ConformanceError;
pub use conformance::check_store;
pub use interfaces::Store;
pub use interfaces::StoreError;
pub use interfaces::ValidationError;
pub use memory::InMemoryStore;
pub use validation::check_key;
