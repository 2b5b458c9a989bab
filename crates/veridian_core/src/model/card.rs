//! Credit card domain model.

use super::validation::{
    require_day_of_month, require_non_negative, require_not_blank, ValidationError,
};
use super::{new_entity_id, EntityId};
use serde::{Deserialize, Serialize};

/// Card network/brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardBrand {
    #[serde(rename = "Mastercard")]
    Mastercard,
    #[serde(rename = "Visa")]
    Visa,
    #[serde(rename = "American Express")]
    Amex,
    #[serde(rename = "Elo")]
    Elo,
}

/// Credit card with its limit usage and billing cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: EntityId,
    pub name: String,
    pub bank: String,
    pub brand: CardBrand,
    pub limit_total: f64,
    pub limit_used: f64,
    /// Day of month the statement closes.
    pub closing_day: u8,
    /// Day of month the payment is due.
    pub due_day: u8,
    /// Display color, usually a CSS hex string.
    pub color: String,
}

impl CreditCard {
    /// Creates a card with a generated id and no limit used.
    pub fn new(
        name: impl Into<String>,
        bank: impl Into<String>,
        brand: CardBrand,
        limit_total: f64,
        closing_day: u8,
        due_day: u8,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            bank: bank.into(),
            brand,
            limit_total,
            limit_used: 0.0,
            closing_day,
            due_day,
            color: "#1C1C1C".to_string(),
        }
    }

    /// Remaining limit, which may be negative when the card is over limit.
    pub fn limit_available(&self) -> f64 {
        self.limit_total - self.limit_used
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_not_blank("card.id", &self.id)?;
        require_non_negative("card.limitTotal", self.limit_total)?;
        require_non_negative("card.limitUsed", self.limit_used)?;
        require_day_of_month("card.closingDay", self.closing_day)?;
        require_day_of_month("card.dueDay", self.due_day)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CardBrand, CreditCard};
    use crate::model::validation::ValidationError;

    #[test]
    fn validate_checks_billing_days() {
        let mut card = CreditCard::new("Black", "Nubank", CardBrand::Visa, 5000.0, 3, 10);
        assert!(card.validate().is_ok());

        card.due_day = 32;
        assert_eq!(
            card.validate(),
            Err(ValidationError::DayOutOfRange {
                field: "card.dueDay",
                value: 32
            })
        );
    }

    #[test]
    fn brand_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&CardBrand::Amex).unwrap();
        assert_eq!(json, "\"American Express\"");
    }
}
