//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `veridian_core` linkage.
//! - Open the configured store and print a one-line snapshot summary.

use std::process::ExitCode;
use veridian_core::{open_db, FinanceStore, SqliteSnapshotRepository, StoreConfig};

fn main() -> ExitCode {
    println!("veridian_core ping={}", veridian_core::ping());
    println!("veridian_core version={}", veridian_core::core_version());

    match summarize(&StoreConfig::from_env()) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("veridian_core store=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(config: &StoreConfig) -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let repo = SqliteSnapshotRepository::try_new(&conn, config.slot_key.as_str())?;
    let store = FinanceStore::open(repo);
    let state = store.state();

    Ok(format!(
        "veridian_core store=ok slot={} schema={} users={} transactions={} cards={} goals={} investments={} unread_notifications={}",
        config.slot_key,
        state.schema_version,
        state.users.len(),
        state.transactions.len(),
        state.cards.len(),
        state.goals.len(),
        state.investments.len(),
        state.notifications.iter().filter(|n| !n.read).count()
    ))
}
