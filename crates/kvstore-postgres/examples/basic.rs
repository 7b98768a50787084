// crates/kvstore-postgres/examples/basic.rs
// ============================================================================
// Module: Basic Usage Example
// Description: Connect, provision a table, and round trip one value.
// Purpose: Show the minimal wiring of pool, options, and client.
// Dependencies: kvstore-core, kvstore-postgres, tracing-subscriber
// ============================================================================

//! Runs a set/get/delete round trip against Postgres.
//!
//! The pool is configured from the TOML file named by `KVSTORE_CONFIG` when
//! set, otherwise from the connection string in `KVSTORE_PG_URL`, falling back
//! to the default local server. Set `RUST_LOG=debug` to see provisioning.

use std::env;
use std::error::Error;
use std::path::Path;

use kvstore_core::Store;
use kvstore_postgres::Client;
use kvstore_postgres::Options;
use kvstore_postgres::PostgresPool;
use kvstore_postgres::PostgresPoolConfig;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Example value stored under `user:1`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct User {
    /// Display name.
    name: String,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).try_init();

    let config = match (env::var("KVSTORE_CONFIG"), env::var("KVSTORE_PG_URL")) {
        (Ok(path), _) => PostgresPoolConfig::load(Path::new(&path))?,
        (Err(_), Ok(url)) => PostgresPoolConfig::new(url),
        (Err(_), Err(_)) => PostgresPoolConfig::default(),
    };
    let pool = PostgresPool::connect(&config)?;
    let client = Client::new(Options::new(pool).with_table_name("kv_example"))?;

    client.set("user:1", &User { name: "Ann".to_string() })?;
    let mut user = User::default();
    if client.get("user:1", &mut user)? {
        info!(name = %user.name, "loaded user:1");
    }
    client.delete("user:1")?;
    let found = client.get("user:1", &mut user)?;
    info!(found, "user:1 after delete");

    client.close()?;
    Ok(())
}
