// crates/kvstore-postgres/src/schema.rs
// ============================================================================
// Module: Table Schema
// Description: Table name validation and precomputed SQL statements.
// Purpose: Fix every statement a client issues at construction time.
// Dependencies: kvstore-core
// ============================================================================

//! ## Overview
//! The table name is interpolated into SQL, so [`TableName`] only admits plain
//! identifiers: one or two dot-separated parts (`table` or `schema.table`),
//! each matching `[A-Za-z_][A-Za-z0-9_]*` and at most 63 bytes long.
//! Unquoted identifiers fold to lower case in Postgres, so `Item` and `item`
//! name the same table.

use std::fmt;

use kvstore_core::StoreError;

/// Maximum identifier length accepted by Postgres without truncation.
const MAX_IDENTIFIER_BYTES: usize = 63;

// ============================================================================
// SECTION: Table Name
// ============================================================================

/// Validated table identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validates `raw` as a table identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when `raw` is not a plain identifier.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let mut parts = 0_usize;
        for part in raw.split('.') {
            parts += 1;
            if parts > 2 || !is_identifier(part) {
                return Err(StoreError::Config(format!("invalid table name: {raw:?}")));
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true when `part` is a plain SQL identifier.
fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    part.len() <= MAX_IDENTIFIER_BYTES
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// SECTION: Statements
// ============================================================================

/// SQL statements bound to one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    /// Idempotent table provisioning.
    create_table: String,
    /// Insert-or-replace keyed by `k`.
    upsert: String,
    /// Point lookup of `v` by `k`.
    select: String,
    /// Point delete by `k`.
    delete: String,
}

impl Statements {
    /// Builds the statements for `table`.
    #[must_use]
    pub fn for_table(table: &TableName) -> Self {
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (k TEXT PRIMARY KEY, v BYTEA NOT NULL)"
            ),
            upsert: format!(
                "INSERT INTO {table} (k, v) VALUES ($1, $2) ON CONFLICT (k) DO UPDATE SET v = \
                 EXCLUDED.v"
            ),
            select: format!("SELECT v FROM {table} WHERE k=$1"),
            delete: format!("DELETE FROM {table} WHERE k=$1"),
        }
    }

    /// Returns the table provisioning statement.
    #[must_use]
    pub fn create_table(&self) -> &str {
        &self.create_table
    }

    /// Returns the upsert statement (`$1` key, `$2` payload).
    #[must_use]
    pub fn upsert(&self) -> &str {
        &self.upsert
    }

    /// Returns the point select statement (`$1` key).
    #[must_use]
    pub fn select(&self) -> &str {
        &self.select
    }

    /// Returns the point delete statement (`$1` key).
    #[must_use]
    pub fn delete(&self) -> &str {
        &self.delete
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
