// crates/kvstore-core/src/validation.rs
// ============================================================================
// Module: Input Validation
// Description: Shared key checks applied before any backend I/O.
// Purpose: Give every backend identical rejection behavior for bad input.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! Keys must be non-empty. Value targets need no runtime check: `set` takes a
//! shared reference and `get` a mutable one, so a missing target cannot be
//! expressed.

use crate::interfaces::ValidationError;

/// Checks that a key is usable.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyKey`] when `key` is empty.
pub const fn check_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    Ok(())
}
