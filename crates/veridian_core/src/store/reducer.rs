//! Pure state transitions.
//!
//! # Responsibility
//! - Map `(FinancialState, Command)` to the next aggregate.
//! - Report whether anything changed so callers can skip persistence.
//!
//! # Invariants
//! - Total: every command yields a state; unknown ids are no-ops.
//! - Adds reusing an id already present in the collection are no-ops.
//! - No clock, randomness or I/O; ids and timestamps arrive in the command.
//! - Aggregate invariants hold after every transition that starts from a
//!   valid state.

use super::command::Command;
use crate::model::card::CreditCard;
use crate::model::goal::Goal;
use crate::model::investment::Investment;
use crate::model::notification::MAX_NOTIFICATIONS;
use crate::model::state::FinancialState;
use crate::model::transaction::Transaction;

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transition {
    pub state: FinancialState,
    /// `false` when the command was a no-op.
    pub changed: bool,
}

/// Applies `command` to an owned aggregate.
pub(crate) fn reduce(mut state: FinancialState, command: Command) -> Transition {
    let changed = apply(&mut state, command);
    Transition { state, changed }
}

/// In-place form of [`reduce`]; returns whether the aggregate changed.
fn apply(state: &mut FinancialState, command: Command) -> bool {
    match command {
        Command::AddTransaction(transaction) => {
            if contains_key(&state.transactions, &transaction.id) {
                return false;
            }
            state.transactions.insert(0, transaction);
            true
        }
        Command::UpdateTransaction(transaction) => {
            replace_by_id(&mut state.transactions, transaction)
        }
        Command::RemoveTransaction(id) => remove_by_id(&mut state.transactions, &id),

        Command::AddCard(card) => push_new(&mut state.cards, card),
        Command::UpdateCard(card) => replace_by_id(&mut state.cards, card),
        Command::RemoveCard(id) => remove_by_id(&mut state.cards, &id),

        Command::AddGoal(goal) => {
            if contains_key(&state.goals, &goal.id) {
                return false;
            }
            if goal.is_featured {
                clear_featured(&mut state.goals, None);
            }
            state.goals.push(goal);
            true
        }
        Command::UpdateGoal(goal) => {
            if !state.goals.iter().any(|item| item.id == goal.id) {
                return false;
            }
            let mut changed = false;
            if goal.is_featured {
                changed |= clear_featured(&mut state.goals, Some(&goal.id));
            }
            changed | replace_by_id(&mut state.goals, goal)
        }
        Command::RemoveGoal(id) => remove_by_id(&mut state.goals, &id),

        Command::AddInvestment(investment) => push_new(&mut state.investments, investment),
        Command::UpdateInvestment(investment) => replace_by_id(&mut state.investments, investment),
        Command::RemoveInvestment(id) => remove_by_id(&mut state.investments, &id),

        Command::UpdateProfile(mut patch) => {
            let owner = state.active_profile().id;
            let rejected_email = patch.email.as_deref().is_some_and(|email| {
                email.trim().is_empty() || state.email_taken_by_other(email, owner)
            });
            if rejected_email {
                patch.email = None;
            }
            patch.apply_to(state.active_profile_mut())
        }
        Command::RegisterUser(user) => {
            if user.is_guest()
                || state.user_by_id(user.id).is_some()
                || state.find_user_by_email(&user.email).is_some()
            {
                return false;
            }
            state.users.push(user);
            true
        }
        Command::ActivateUser(user_id) => {
            if state.active_user_id == Some(user_id) || state.user_by_id(user_id).is_none() {
                return false;
            }
            state.active_user_id = Some(user_id);
            true
        }
        Command::SetPasswordHash { user_id, hash } => {
            match state.users.iter_mut().find(|user| user.id == user_id) {
                Some(user) => {
                    user.password_hash = Some(hash);
                    true
                }
                None => false,
            }
        }

        Command::UpdateBudget { category, limit } => {
            match state
                .budgets
                .iter_mut()
                .find(|budget| budget.category == category)
            {
                Some(budget) if budget.limit != limit => {
                    budget.limit = limit;
                    true
                }
                _ => false,
            }
        }
        Command::UnlockAchievement(id) => {
            match state
                .achievements
                .iter_mut()
                .find(|achievement| achievement.id == id)
            {
                Some(achievement) if !achievement.unlocked => {
                    achievement.unlocked = true;
                    true
                }
                _ => false,
            }
        }
        Command::MarkNotificationsRead => {
            let mut changed = false;
            for notification in state.notifications.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed = true;
            }
            changed
        }
        Command::AddNotification(mut notification) => {
            notification.read = false;
            state.notifications.insert(0, notification);
            state.notifications.truncate(MAX_NOTIFICATIONS);
            true
        }
    }
}

/// Entities addressed by an opaque string id.
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Transaction {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for CreditCard {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Goal {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Investment {
    fn key(&self) -> &str {
        &self.id
    }
}

fn contains_key<T: Keyed>(items: &[T], id: &str) -> bool {
    items.iter().any(|item| item.key() == id)
}

fn push_new<T: Keyed>(items: &mut Vec<T>, item: T) -> bool {
    if contains_key(items, item.key()) {
        return false;
    }
    items.push(item);
    true
}

fn replace_by_id<T: Keyed + PartialEq>(items: &mut [T], replacement: T) -> bool {
    match items.iter_mut().find(|item| item.key() == replacement.key()) {
        Some(slot) if *slot != replacement => {
            *slot = replacement;
            true
        }
        _ => false,
    }
}

fn remove_by_id<T: Keyed>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.key() != id);
    items.len() != before
}

/// Clears `is_featured` on every goal except `keep`.
fn clear_featured(goals: &mut [Goal], keep: Option<&str>) -> bool {
    let mut changed = false;
    for goal in goals
        .iter_mut()
        .filter(|goal| goal.is_featured && Some(goal.id.as_str()) != keep)
    {
        goal.is_featured = false;
        changed = true;
    }
    changed
}
