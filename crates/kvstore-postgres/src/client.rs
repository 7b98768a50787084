// crates/kvstore-postgres/src/client.rs
// ============================================================================
// Module: Postgres Store Client
// Description: Store contract implementation over a single Postgres table.
// Purpose: Provision the table, then serve set/get/delete via pooled statements.
// Dependencies: crate::{options, pool, schema}, kvstore-core, serde, tracing
// ============================================================================

//! ## Overview
//! A [`Client`] is built once from [`Options`]: it resolves defaults, fixes
//! its SQL statements for the configured table, and runs
//! `CREATE TABLE IF NOT EXISTS` so concurrent constructions against the same
//! table all succeed. Afterwards it holds only immutable state; every
//! operation is one independent statement through the pool.
//!
//! Failures from the pool and the codec are returned unchanged. A missing row
//! is not a failure: [`Store::get`] returns `Ok(false)` and [`Store::delete`]
//! succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use kvstore_core::Codec;
use kvstore_core::JsonCodec;
use kvstore_core::Store;
use kvstore_core::StoreError;
use kvstore_core::check_key;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::options::DEFAULT_TABLE_NAME;
use crate::options::Options;
use crate::pool::ConnectionPool;
use crate::pool::PoolError;
use crate::schema::Statements;
use crate::schema::TableName;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Postgres-backed key-value store.
#[derive(Debug)]
pub struct Client<P, C = JsonCodec> {
    /// Pool every statement runs through.
    pool: P,
    /// Value codec.
    codec: C,
    /// Backing table.
    table: TableName,
    /// Statements bound to `table`.
    statements: Statements,
}

impl<P, C> Client<P, C>
where
    P: ConnectionPool,
    C: Codec,
{
    /// Builds a client and provisions its table.
    ///
    /// The pool is closed when provisioning fails. Provisioning is retried once
    /// when Postgres reports that a concurrent session created the table first;
    /// this is the only retry in the crate, and no statement is ever retried
    /// after construction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when the pool is missing or the table
    /// name is not a plain identifier, and [`StoreError::Backend`] when the
    /// table cannot be provisioned.
    pub fn new(options: Options<P, C>) -> Result<Self, StoreError> {
        let Options {
            pool,
            table_name,
            codec,
        } = options;
        let pool =
            pool.ok_or_else(|| StoreError::Config("connection pool must be set".to_string()))?;
        let table_name = table_name.filter(|name| !name.is_empty());
        let table = TableName::parse(table_name.as_deref().unwrap_or(DEFAULT_TABLE_NAME))?;
        let statements = Statements::for_table(&table);

        if let Err(err) = provision(&pool, &table, &statements) {
            warn!(table = %table, error = %err, "kv table provisioning failed; closing pool");
            pool.close();
            return Err(StoreError::backend(err));
        }
        debug!(table = %table, "kv table provisioned");

        Ok(Self {
            pool,
            codec,
            table,
            statements,
        })
    }
}

/// Runs the table provisioning statement.
///
/// Postgres can reject `CREATE TABLE IF NOT EXISTS` when another session
/// creates the same table at the same moment. The table exists afterwards, so
/// a single retry settles it.
fn provision<P: ConnectionPool>(
    pool: &P,
    table: &TableName,
    statements: &Statements,
) -> Result<(), PoolError> {
    match pool.execute(statements.create_table(), &[]) {
        Err(err) if err.is_concurrent_create() => {
            debug!(table = %table, "kv table created concurrently; retrying provisioning");
            pool.execute(statements.create_table(), &[]).map(|_| ())
        }
        result => result.map(|_| ()),
    }
}

impl<P, C> Client<P, C> {
    /// Returns the backing table name.
    #[must_use]
    pub const fn table_name(&self) -> &TableName {
        &self.table
    }

    /// Returns the statements this client issues.
    #[must_use]
    pub const fn statements(&self) -> &Statements {
        &self.statements
    }

    /// Returns the value codec.
    #[must_use]
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &P {
        &self.pool
    }
}

impl<P, C> Store for Client<P, C>
where
    P: ConnectionPool,
    C: Codec,
{
    fn set<V>(&self, key: &str, value: &V) -> Result<(), StoreError>
    where
        V: Serialize + ?Sized,
    {
        check_key(key)?;
        let data = self.codec.marshal(value)?;
        trace!(table = %self.table, "kv set");
        self.pool.execute(self.statements.upsert(), &[&key, &data]).map_err(StoreError::backend)?;
        Ok(())
    }

    fn get<V>(&self, key: &str, target: &mut V) -> Result<bool, StoreError>
    where
        V: DeserializeOwned,
    {
        check_key(key)?;
        trace!(table = %self.table, "kv get");
        let data =
            self.pool.query_value(self.statements.select(), &[&key]).map_err(StoreError::backend)?;
        let Some(data) = data else {
            return Ok(false);
        };
        *target = self.codec.unmarshal(&data)?;
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        trace!(table = %self.table, "kv delete");
        self.pool.execute(self.statements.delete(), &[&key]).map_err(StoreError::backend)?;
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        debug!(table = %self.table, "closing kv client pool");
        self.pool.close();
        Ok(())
    }
}
