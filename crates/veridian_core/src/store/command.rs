//! Mutation commands accepted by the reducer.
//!
//! Every state change goes through one of these variants; there is no other
//! mutation path into `FinancialState`.

use crate::auth::password::PasswordHash;
use crate::model::card::CreditCard;
use crate::model::category::Category;
use crate::model::goal::Goal;
use crate::model::investment::Investment;
use crate::model::notification::Notification;
use crate::model::transaction::Transaction;
use crate::model::user::{ProfilePatch, UserId, UserProfile};
use crate::model::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddTransaction(Transaction),
    UpdateTransaction(Transaction),
    RemoveTransaction(EntityId),
    AddCard(CreditCard),
    UpdateCard(CreditCard),
    RemoveCard(EntityId),
    AddGoal(Goal),
    UpdateGoal(Goal),
    RemoveGoal(EntityId),
    AddInvestment(Investment),
    UpdateInvestment(Investment),
    RemoveInvestment(EntityId),
    UpdateProfile(ProfilePatch),
    RegisterUser(UserProfile),
    /// Points the active profile at a registry user.
    ActivateUser(UserId),
    SetPasswordHash {
        user_id: UserId,
        hash: PasswordHash,
    },
    UpdateBudget {
        category: Category,
        limit: f64,
    },
    UnlockAchievement(String),
    MarkNotificationsRead,
    /// Notification already stamped with id and creation time.
    AddNotification(Notification),
}

impl Command {
    /// Stable label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddTransaction(_) => "add_transaction",
            Self::UpdateTransaction(_) => "update_transaction",
            Self::RemoveTransaction(_) => "remove_transaction",
            Self::AddCard(_) => "add_card",
            Self::UpdateCard(_) => "update_card",
            Self::RemoveCard(_) => "remove_card",
            Self::AddGoal(_) => "add_goal",
            Self::UpdateGoal(_) => "update_goal",
            Self::RemoveGoal(_) => "remove_goal",
            Self::AddInvestment(_) => "add_investment",
            Self::UpdateInvestment(_) => "update_investment",
            Self::RemoveInvestment(_) => "remove_investment",
            Self::UpdateProfile(_) => "update_profile",
            Self::RegisterUser(_) => "register_user",
            Self::ActivateUser(_) => "activate_user",
            Self::SetPasswordHash { .. } => "set_password_hash",
            Self::UpdateBudget { .. } => "update_budget",
            Self::UnlockAchievement(_) => "unlock_achievement",
            Self::MarkNotificationsRead => "mark_notifications_read",
            Self::AddNotification(_) => "add_notification",
        }
    }
}
