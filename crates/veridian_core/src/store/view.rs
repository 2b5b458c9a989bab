//! Read-only projections handed to consumers outside the core.

use crate::model::budget::CategoryBudget;
use crate::model::goal::Goal;
use crate::model::investment::Investment;
use crate::model::state::FinancialState;
use crate::model::user::{PlanTier, UserProfile};
use serde::Serialize;

/// Profile fields safe to share with collaborators; no email or credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub name: String,
    pub monthly_income: f64,
    pub monthly_savings_target: f64,
    pub financial_goal: String,
    pub plan: PlanTier,
}

impl From<&UserProfile> for ProfileSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            monthly_income: profile.monthly_income,
            monthly_savings_target: profile.monthly_savings_target,
            financial_goal: profile.financial_goal.clone(),
            plan: profile.plan,
        }
    }
}

/// Detached copy of what the coaching assistant reads to build its prompt.
///
/// Owning its data lets the consumer hold it across a slow remote call
/// without borrowing the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingSnapshot {
    pub profile: ProfileSummary,
    pub budgets: Vec<CategoryBudget>,
    pub goals: Vec<Goal>,
    pub investments: Vec<Investment>,
}

impl CoachingSnapshot {
    pub fn capture(state: &FinancialState) -> Self {
        Self {
            profile: ProfileSummary::from(state.active_profile()),
            budgets: state.budgets.clone(),
            goals: state.goals.clone(),
            investments: state.investments.clone(),
        }
    }
}
