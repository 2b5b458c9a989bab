//! Ordered SQLite schema migrations for the snapshot store.
//!
//! # Responsibility
//! - List the schema steps backing `snapshot_slots`.
//! - Bring a connection up to the latest step inside one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - `PRAGMA user_version` always equals the last applied step.
//! - A failed step rolls back every step of the same run.
//!
//! SQL for each step lives next to this module as `NNNN_<name>.sql`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "snapshot_slots",
        sql: include_str!("0001_snapshot_slots.sql"),
    },
    SchemaStep {
        version: 2,
        name: "snapshot_slot_checks",
        sql: include_str!("0002_snapshot_slot_checks.sql"),
    },
];

/// Schema version produced by running every known step.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Runs the steps newer than the connection's `user_version`.
///
/// Returns how many steps were applied.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this build.
/// - `Migration` when a step's SQL fails; nothing from the run is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let current = user_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > current)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok step={} to_version={}",
            step.name, step.version
        );
    }
    tx.commit()?;

    Ok(pending.len())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
