//! Spending/income category shared by transactions and budgets.
//!
//! # Responsibility
//! - Replace free-text category labels with one closed set of keys.
//! - Keep the persisted wire labels compatible with existing snapshots.
//!
//! # Invariants
//! - Every `Category` has exactly one wire label.
//! - Label parsing is case-insensitive and accent-insensitive.

use serde::{Deserialize, Serialize};

/// Closed set of categories used by transactions and budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Geral")]
    General,
    #[serde(rename = "Alimentação")]
    Food,
    #[serde(rename = "Moradia")]
    Housing,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Lazer")]
    Leisure,
    #[serde(rename = "Saúde")]
    Health,
    #[serde(rename = "Salário")]
    Salary,
}

const ALL_CATEGORIES: &[Category] = &[
    Category::General,
    Category::Food,
    Category::Housing,
    Category::Transport,
    Category::Leisure,
    Category::Health,
    Category::Salary,
];

impl Category {
    /// Returns every known category in display order.
    pub fn all() -> &'static [Category] {
        ALL_CATEGORIES
    }

    /// Stable wire label stored in snapshots.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "Geral",
            Self::Food => "Alimentação",
            Self::Housing => "Moradia",
            Self::Transport => "Transporte",
            Self::Leisure => "Lazer",
            Self::Health => "Saúde",
            Self::Salary => "Salário",
        }
    }

    /// Parses a free-text label, tolerating case and missing accents.
    ///
    /// Returns `None` for labels outside the known set.
    pub fn from_label(value: &str) -> Option<Self> {
        let folded = fold_label(value);
        if folded.is_empty() {
            return None;
        }
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|category| fold_label(category.label()) == folded)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn fold_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn from_label_ignores_case_and_accents() {
        assert_eq!(Category::from_label("alimentacao"), Some(Category::Food));
        assert_eq!(Category::from_label(" SAÚDE "), Some(Category::Health));
        assert_eq!(Category::from_label("Salario"), Some(Category::Salary));
    }

    #[test]
    fn from_label_rejects_unknown_and_blank_values() {
        assert_eq!(Category::from_label("Viagem"), None);
        assert_eq!(Category::from_label("   "), None);
    }

    #[test]
    fn serde_uses_wire_labels() {
        let json = serde_json::to_string(&Category::Transport).unwrap();
        assert_eq!(json, "\"Transporte\"");
        let parsed: Category = serde_json::from_str("\"Moradia\"").unwrap();
        assert_eq!(parsed, Category::Housing);
    }
}
