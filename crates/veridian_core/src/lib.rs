//! Core domain logic for Veridian personal finance.
//! This crate is the single source of truth for the financial aggregate and
//! its invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod repo;
pub mod store;

pub use auth::{LoginError, PasswordHash, Session, SessionState, SignUpError};
pub use config::StoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::state::FinancialState;
pub use model::validation::ValidationError;
pub use persistence::SnapshotError;
pub use repo::snapshot_repo::{
    MemorySnapshotRepository, RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use store::{CoachingSnapshot, FinanceStore, ProfileSummary};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
