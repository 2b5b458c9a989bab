//! Savings goal domain model.
//!
//! # Invariants
//! - At most one goal in the aggregate has `is_featured == true`. The flag is
//!   cleared on other goals by the store reducer, not by this type.

use super::validation::{require_non_negative, require_not_blank, require_positive, ValidationError};
use super::{new_entity_id, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Savings goal tracked towards a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: EntityId,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    /// Estimated monthly contribution towards the target.
    pub monthly_contribution: f64,
    pub deadline: NaiveDate,
    /// Icon tag (`Target`, `Plane`, `Shield`, `Home`, `Car`, ...).
    pub icon: String,
    pub is_featured: bool,
}

impl Goal {
    /// Creates a non-featured goal with a generated id and nothing saved yet.
    pub fn new(title: impl Into<String>, target_amount: f64, deadline: NaiveDate) -> Self {
        Self {
            id: new_entity_id(),
            title: title.into(),
            target_amount,
            current_amount: 0.0,
            monthly_contribution: 0.0,
            deadline,
            icon: "Target".to_string(),
            is_featured: false,
        }
    }

    /// Progress towards the target in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_not_blank("goal.id", &self.id)?;
        require_positive("goal.targetAmount", self.target_amount)?;
        require_non_negative("goal.currentAmount", self.current_amount)?;
        require_non_negative("goal.monthlyContribution", self.monthly_contribution)?;
        Ok(())
    }
}
