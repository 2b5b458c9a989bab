//! Repository layer: the persistence port for the aggregate snapshot.
//!
//! # Responsibility
//! - Define the slot contract used by the persistence adapter.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repositories move opaque payload strings; JSON handling lives in
//!   `persistence`.

pub mod snapshot_repo;
