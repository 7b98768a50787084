// crates/kvstore-postgres/src/lib.rs
// ============================================================================
// Module: KV Store Postgres Library
// Description: Postgres backend for the key-value store contract.
// Purpose: Persist key-value records in one pooled Postgres table.
// Dependencies: crate::{client, config, options, pool, schema}
// ============================================================================

//! ## Overview
//! [`Client`] implements [`kvstore_core::Store`] over a single table with a
//! `k TEXT PRIMARY KEY` column and a `v BYTEA NOT NULL` payload column. The
//! table is created on construction when absent, writes are one atomic
//! upsert, and a missing row is reported as "not found" rather than an error.
//!
//! Statements run through a [`ConnectionPool`]; [`PostgresPool`] is the
//! r2d2-backed implementation used in production.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod options;
pub mod pool;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::Client;
pub use config::ConfigError;
pub use config::PostgresPoolConfig;
pub use options::DEFAULT_TABLE_NAME;
pub use options::Options;
pub use pool::ConnectionPool;
pub use pool::PoolError;
pub use pool::PostgresPool;
pub use schema::Statements;
pub use schema::TableName;
