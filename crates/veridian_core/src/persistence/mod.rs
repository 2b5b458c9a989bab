//! Persistence adapter between the aggregate and the snapshot slot.
//!
//! # Responsibility
//! - Load the aggregate from the slot, upgrading older snapshot schemas.
//! - Save the full aggregate as JSON after every committed change.
//!
//! # Invariants
//! - `load` never fails: missing, unparsable or unsupported payloads degrade
//!   to the seed aggregate.
//! - `save` never fails: write errors are logged and swallowed.
//! - Loaded aggregates satisfy `FinancialState::check_invariants`.

pub mod upgrade;

use crate::model::state::FinancialState;
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Reason a snapshot could not be read or written.
#[derive(Debug)]
pub enum SnapshotError {
    Repo(RepoError),
    Json(serde_json::Error),
    /// Payload is valid JSON but not an object.
    NotAnObject,
    /// `schemaVersion` is present but not a positive integer.
    InvalidVersion(String),
    UnsupportedVersion {
        snapshot_version: u64,
        latest_supported: u32,
    },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "snapshot json error: {err}"),
            Self::NotAnObject => f.write_str("snapshot payload is not a JSON object"),
            Self::InvalidVersion(value) => write!(f, "invalid snapshot schema version `{value}`"),
            Self::UnsupportedVersion {
                snapshot_version,
                latest_supported,
            } => write!(
                f,
                "snapshot schema version {snapshot_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotAnObject | Self::InvalidVersion(_) | Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<RepoError> for SnapshotError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Loads the aggregate, falling back to the seed default on any failure.
pub fn load<R: SnapshotRepository>(repo: &R) -> FinancialState {
    match try_load(repo) {
        Ok(Some(state)) => state,
        Ok(None) => {
            info!("event=snapshot_load module=persistence status=empty fallback=seed");
            FinancialState::default()
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=persistence status=error fallback=seed error={}",
                err
            );
            FinancialState::default()
        }
    }
}

/// Loads the aggregate and reports why it could not be decoded.
///
/// Returns `Ok(None)` when the slot was never written.
pub fn try_load<R: SnapshotRepository>(repo: &R) -> Result<Option<FinancialState>, SnapshotError> {
    let started_at = Instant::now();
    let Some(payload) = repo.read_slot()? else {
        return Ok(None);
    };

    let mut value: serde_json::Value = serde_json::from_str(&payload)?;
    let from_version = upgrade::upgrade_snapshot(&mut value)?;
    let mut state: FinancialState = serde_json::from_value(value)?;

    let repaired = state.repair();
    if repaired > 0 {
        warn!(
            "event=snapshot_repair module=persistence status=ok repaired_entries={}",
            repaired
        );
    }

    info!(
        "event=snapshot_load module=persistence status=ok from_version={} bytes={} duration_ms={}",
        from_version,
        payload.len(),
        started_at.elapsed().as_millis()
    );
    Ok(Some(state))
}

/// Writes the aggregate; failures are logged, never returned.
pub fn save<R: SnapshotRepository>(repo: &R, state: &FinancialState) {
    if let Err(err) = try_save(repo, state) {
        warn!(
            "event=snapshot_save module=persistence status=error error={}",
            err
        );
    }
}

/// Writes the aggregate and returns the failure reason, if any.
pub fn try_save<R: SnapshotRepository>(repo: &R, state: &FinancialState) -> Result<(), SnapshotError> {
    let payload = serde_json::to_string(state)?;
    repo.write_slot(&payload)?;
    Ok(())
}
