// crates/kvstore-postgres/src/pool.rs
// ============================================================================
// Module: Connection Pool
// Description: Statement execution seam and its r2d2-backed implementation.
// Purpose: Route each statement through a pooled Postgres connection.
// Dependencies: crate::config, postgres, r2d2, r2d2_postgres, thiserror
// ============================================================================

//! ## Overview
//! [`ConnectionPool`] is the only surface the store client uses to reach the
//! database: execute a statement, fetch one optional value, and shut down.
//! [`PostgresPool`] checks out one r2d2 connection per statement; the
//! connection returns to the pool when the call exits, on success or failure.
//!
//! Wrap a pool in [`Arc`] to back several clients with it. Closing it through
//! any client closes it for all of them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;
use std::time::Duration;

use postgres::NoTls;
use postgres::error::SqlState;
use postgres::types::ToSql;
use r2d2::Pool;
use r2d2::PooledConnection;
use r2d2_postgres::PostgresConnectionManager;
use thiserror::Error;

use crate::config::ConfigError;
use crate::config::PostgresPoolConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Connection pool errors.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool was closed.
    #[error("postgres pool closed")]
    Closed,
    /// The pool lock was poisoned by a panicking thread.
    #[error("postgres pool lock poisoned")]
    Poisoned,
    /// Pool configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No connection could be checked out.
    #[error("postgres pool checkout failed: {0}")]
    Checkout(#[from] r2d2::Error),
    /// Postgres reported an error.
    #[error(transparent)]
    Postgres(#[from] postgres::Error),
}

impl PoolError {
    /// Returns true when Postgres rejected a statement because a concurrent
    /// session created the same object first.
    #[must_use]
    pub fn is_concurrent_create(&self) -> bool {
        let Self::Postgres(err) = self else {
            return false;
        };
        err.code().is_some_and(|code| {
            *code == SqlState::UNIQUE_VIOLATION || *code == SqlState::DUPLICATE_TABLE
        })
    }
}

// ============================================================================
// SECTION: Pool Interface
// ============================================================================

/// Statement execution surface used by the store client.
///
/// Implementations must be safe for concurrent use by independent callers.
pub trait ConnectionPool: Send + Sync {
    /// Executes a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when checkout or execution fails.
    fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64, PoolError>;

    /// Runs a query expected to return at most one row and yields its first
    /// column as bytes. Returns `Ok(None)` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when checkout, execution, or column decoding
    /// fails.
    fn query_value(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Vec<u8>>, PoolError>;

    /// Releases the pool. Later statements fail.
    fn close(&self);
}

impl<P> ConnectionPool for Arc<P>
where
    P: ConnectionPool + ?Sized,
{
    fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64, PoolError> {
        (**self).execute(statement, params)
    }

    fn query_value(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Vec<u8>>, PoolError> {
        (**self).query_value(statement, params)
    }

    fn close(&self) {
        (**self).close();
    }
}

// ============================================================================
// SECTION: Postgres Pool
// ============================================================================

/// Inner r2d2 pool type.
type InnerPool = Pool<PostgresConnectionManager<NoTls>>;

/// r2d2-backed Postgres connection pool.
pub struct PostgresPool {
    /// Live pool; `None` once closed.
    pool: RwLock<Option<InnerPool>>,
}

impl PostgresPool {
    /// Builds a pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when the configuration is invalid, the
    /// connection string does not parse, or no connection can be established
    /// within the connect timeout.
    pub fn connect(config: &PostgresPoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let mut pg_config = config.connection.parse::<postgres::Config>()?;
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        pg_config.connect_timeout(connect_timeout);
        let options = format!("-c statement_timeout={}", config.statement_timeout_ms);
        pg_config.options(&options);
        let manager = PostgresConnectionManager::new(pg_config, NoTls);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(connect_timeout)
            .build(manager)?;
        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing r2d2 pool.
    #[must_use]
    pub const fn from_pool(pool: InnerPool) -> Self {
        Self {
            pool: RwLock::new(Some(pool)),
        }
    }

    /// Returns true once the pool has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.pool.read().is_ok_and(|guard| guard.is_some())
    }

    /// Checks out a connection for a single statement.
    fn checkout(&self) -> Result<PooledConnection<PostgresConnectionManager<NoTls>>, PoolError> {
        let guard = self.pool.read().map_err(|_| PoolError::Poisoned)?;
        let pool = guard.as_ref().ok_or(PoolError::Closed)?;
        Ok(pool.get()?)
    }
}

impl ConnectionPool for PostgresPool {
    fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64, PoolError> {
        let mut conn = self.checkout()?;
        Ok(conn.execute(statement, params)?)
    }

    fn query_value(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Vec<u8>>, PoolError> {
        let mut conn = self.checkout()?;
        let Some(row) = conn.query_opt(statement, params)? else {
            return Ok(None);
        };
        let value: Vec<u8> = row.try_get(0)?;
        Ok(Some(value))
    }

    fn close(&self) {
        let pool = match self.pool.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        // The sync postgres client owns a runtime; drop it off the caller's thread.
        if let Some(pool) = pool {
            let _ = std::thread::spawn(move || drop(pool));
        }
    }
}

impl Drop for PostgresPool {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for PostgresPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresPool").field("closed", &self.is_closed()).finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

    use std::time::Duration;

    use postgres::NoTls;
    use r2d2::Pool;
    use r2d2_postgres::PostgresConnectionManager;

    use super::ConnectionPool;
    use super::PoolError;
    use super::PostgresPool;
    use crate::config::ConfigError;
    use crate::config::PostgresPoolConfig;

    #[test]
    fn postgres_pool_rejects_invalid_connection_string() {
        let config = PostgresPoolConfig::new("not a url = =");
        let result = PostgresPool::connect(&config);
        assert!(matches!(result, Err(PoolError::Postgres(_))));
    }

    #[test]
    fn postgres_pool_rejects_invalid_config_before_connecting() {
        let config = PostgresPoolConfig {
            max_connections: 0,
            ..PostgresPoolConfig::default()
        };
        let result = PostgresPool::connect(&config);
        assert!(matches!(result, Err(PoolError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn pool_error_messages_are_stable() {
        assert_eq!(PoolError::Closed.to_string(), "postgres pool closed");
        assert_eq!(PoolError::Poisoned.to_string(), "postgres pool lock poisoned");
    }

    #[test]
    fn pool_side_errors_are_not_concurrent_creates() {
        assert!(!PoolError::Closed.is_concurrent_create());
        assert!(!PoolError::Poisoned.is_concurrent_create());
    }

    #[test]
    fn postgres_pool_close_is_idempotent_and_rejects_statements() {
        let mut config = "host=127.0.0.1 port=1 user=kv".parse::<postgres::Config>().expect("config");
        config.connect_timeout(Duration::from_millis(50));
        let manager = PostgresConnectionManager::new(config, NoTls);
        let inner = Pool::builder().max_size(1).min_idle(Some(0)).build_unchecked(manager);
        let pool = PostgresPool::from_pool(inner);
        assert!(!pool.is_closed());

        pool.close();
        pool.close();
        assert!(pool.is_closed());
        assert!(matches!(pool.execute("SELECT 1", &[]), Err(PoolError::Closed)));
        assert!(matches!(pool.query_value("SELECT 1", &[]), Err(PoolError::Closed)));
    }
}
