//! Finance domain model.
//!
//! # Responsibility
//! - Define entity records and the `FinancialState` aggregate.
//! - Keep snapshot wire names (camelCase) stable for persistence.
//!
//! # Invariants
//! - Entities are identified by opaque string ids; users by `UserId`.
//! - Monetary amounts are `f64` values validated as finite before storage.

pub mod achievement;
pub mod budget;
pub mod card;
pub mod category;
pub mod goal;
pub mod investment;
pub mod notification;
pub mod state;
pub mod transaction;
pub mod user;
pub mod validation;

use uuid::Uuid;

/// Opaque identifier for transactions, cards, goals, investments and
/// notifications.
pub type EntityId = String;

/// Generates a fresh entity id.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}
