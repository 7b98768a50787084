// crates/kvstore-postgres/src/options.rs
// ============================================================================
// Module: Client Options
// Description: Pool, table name, and codec handed to client construction.
// Purpose: Hold construction inputs; defaults are filled in by the client.
// Dependencies: kvstore-core
// ============================================================================

//! ## Overview
//! [`Options`] gathers what a [`crate::Client`] needs before it touches the
//! database. The table name falls back to [`DEFAULT_TABLE_NAME`] when unset or
//! empty. The codec is always present: default options carry [`JsonCodec`],
//! and [`Options::with_codec`] swaps in any other [`kvstore_core::Codec`].

use kvstore_core::JsonCodec;

/// Table used when no table name is configured.
pub const DEFAULT_TABLE_NAME: &str = "Item";

/// Construction options for [`crate::Client`].
///
/// An unset pool is rejected when the client is built; an unset or empty table
/// name falls back to [`DEFAULT_TABLE_NAME`]. Building options performs no I/O.
#[derive(Debug, Clone)]
pub struct Options<P, C = JsonCodec> {
    /// Connection pool the client runs statements through.
    pub pool: Option<P>,
    /// Backing table; defaults to [`DEFAULT_TABLE_NAME`].
    pub table_name: Option<String>,
    /// Value codec; [`JsonCodec`] in default options.
    pub codec: C,
}

impl<P, C> Default for Options<P, C>
where
    C: Default,
{
    fn default() -> Self {
        Self {
            pool: None,
            table_name: Some(DEFAULT_TABLE_NAME.to_string()),
            codec: C::default(),
        }
    }
}

impl<P> Options<P, JsonCodec> {
    /// Creates default options for `pool`.
    #[must_use]
    pub fn new(pool: P) -> Self {
        Self::default().with_pool(pool)
    }
}

impl<P, C> Options<P, C> {
    /// Sets the connection pool.
    #[must_use]
    pub fn with_pool(mut self, pool: P) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets the backing table name.
    #[must_use]
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Replaces the value codec.
    #[must_use]
    pub fn with_codec<D>(self, codec: D) -> Options<P, D> {
        Options {
            pool: self.pool,
            table_name: self.table_name,
            codec,
        }
    }
}
