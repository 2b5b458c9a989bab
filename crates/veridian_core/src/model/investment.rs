//! Investment position domain model.
//!
//! `goal_id` is a free reference: it is never checked against the goals
//! collection and may dangle after the goal is removed.

use super::validation::{require_non_negative, require_not_blank, ValidationError};
use super::{new_entity_id, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Asset class of an investment position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentType {
    #[serde(rename = "Renda Fixa")]
    FixedIncome,
    #[serde(rename = "Renda Variável")]
    VariableIncome,
    #[serde(rename = "Fundos")]
    Funds,
    #[serde(rename = "Cripto")]
    Crypto,
    #[serde(rename = "Reserva/Caixa")]
    CashReserve,
}

/// One investment position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InvestmentType,
    pub value_invested: f64,
    pub current_value: f64,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Investment {
    /// Creates a position whose current value equals the invested value.
    pub fn new(
        name: impl Into<String>,
        kind: InvestmentType,
        value_invested: f64,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            kind,
            value_invested,
            current_value: value_invested,
            start_date,
            institution: None,
            goal_id: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_not_blank("investment.id", &self.id)?;
        require_non_negative("investment.valueInvested", self.value_invested)?;
        require_non_negative("investment.currentValue", self.current_value)?;
        Ok(())
    }
}
