//! Achievement catalog.
//!
//! The catalog is fixed; only `unlocked` ever changes after seeding.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub unlocked: bool,
    pub description: String,
}

/// First transaction recorded.
pub const ACHIEVEMENT_FIRST_STEP: &str = "1";
/// All budgets kept within limits for 30 days.
pub const ACHIEVEMENT_BUDGET_MASTER: &str = "2";
/// First goal reached.
pub const ACHIEVEMENT_ELITE_SAVER: &str = "3";

/// Returns the locked catalog used by the seed aggregate.
pub fn achievement_catalog() -> Vec<Achievement> {
    vec![
        catalog_entry(
            ACHIEVEMENT_FIRST_STEP,
            "Primeiro Passo",
            "🎯",
            "Realizou o primeiro lançamento no Veridian.",
        ),
        catalog_entry(
            ACHIEVEMENT_BUDGET_MASTER,
            "Mestre do Orçamento",
            "💰",
            "Manteve todas as categorias no azul por 30 dias.",
        ),
        catalog_entry(
            ACHIEVEMENT_ELITE_SAVER,
            "Poupador Elite",
            "🏆",
            "Alcançou sua primeira meta financeira.",
        ),
    ]
}

fn catalog_entry(id: &str, title: &str, icon: &str, description: &str) -> Achievement {
    Achievement {
        id: id.to_string(),
        title: title.to_string(),
        icon: icon.to_string(),
        unlocked: false,
        description: description.to_string(),
    }
}
