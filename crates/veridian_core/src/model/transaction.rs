//! Transaction domain model.
//!
//! # Responsibility
//! - Define income/expense entries and their optional installment plan.
//!
//! # Invariants
//! - `amount` is finite and strictly positive; direction lives in `kind`.
//! - `id` is opaque and unique within the transactions collection.

use super::category::Category;
use super::validation::{require_non_negative, require_not_blank, require_positive, ValidationError};
use super::{new_entity_id, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// Installment plan attached to a purchase split over several months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: EntityId,
    pub total_amount: f64,
    pub remaining_amount: f64,
    pub total_installments: u32,
    pub current_installment: u32,
    pub next_due_date: NaiveDate,
}

/// One income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: EntityId,
    pub description: String,
    /// Always positive; sign is carried by `kind`.
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Category,
    /// Serialized as `type` to match the snapshot schema.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Installment>,
}

impl Transaction {
    /// Creates a non-recurring transaction with a generated id.
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: Category,
        kind: TransactionType,
    ) -> Self {
        Self {
            id: new_entity_id(),
            description: description.into(),
            amount,
            date,
            category,
            kind,
            is_recurring: false,
            installment: None,
        }
    }

    /// Signed contribution to a balance: positive for income.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_not_blank("transaction.id", &self.id)?;
        require_positive("transaction.amount", self.amount)?;
        if let Some(installment) = &self.installment {
            installment.validate()?;
        }
        Ok(())
    }
}

impl Installment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("installment.totalAmount", self.total_amount)?;
        require_non_negative("installment.remainingAmount", self.remaining_amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Transaction, TransactionType};
    use crate::model::category::Category;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn validate_rejects_zero_and_nan_amounts() {
        let mut tx = Transaction::new("rent", 0.0, day(), Category::Housing, TransactionType::Expense);
        assert!(tx.validate().is_err());
        tx.amount = f64::NAN;
        assert!(tx.validate().is_err());
        tx.amount = 1200.0;
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn serializes_with_snapshot_field_names() {
        let tx = Transaction::new("salary", 5000.0, day(), Category::Salary, TransactionType::Income);
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "INCOME");
        assert_eq!(value["isRecurring"], false);
        assert_eq!(value["date"], "2024-03-10");
        assert_eq!(value["category"], "Salário");
        assert!(value.get("installment").is_none());
    }
}
