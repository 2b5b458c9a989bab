//! Per-category monthly budget.
//!
//! # Invariants
//! - One `CategoryBudget` per `Category` in the aggregate.
//! - `spent` is caller-maintained; no store operation derives it from
//!   transactions.

use super::category::Category;
use super::validation::{require_non_negative, ValidationError};
use serde::{Deserialize, Serialize};

/// Spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
}

impl CategoryBudget {
    pub fn new(category: Category, limit: f64) -> Self {
        Self {
            category,
            limit,
            spent: 0.0,
        }
    }

    pub fn is_over_limit(&self) -> bool {
        self.spent > self.limit
    }
}

/// Validates a budget limit before it reaches the reducer.
pub fn validate_budget_limit(limit: f64) -> Result<(), ValidationError> {
    require_non_negative("budget.limit", limit)
}
