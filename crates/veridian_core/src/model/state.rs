//! The financial aggregate and its seed default.
//!
//! # Responsibility
//! - Hold every domain collection plus the profile registry.
//! - Resolve the active profile as a reference into the registry.
//! - Check and repair aggregate-wide invariants.
//!
//! # Invariants
//! - At most one goal is featured.
//! - Registry emails are case-insensitively unique.
//! - One budget per category.
//! - At most `MAX_NOTIFICATIONS` notifications, newest first.
//! - `active_profile()` always yields a profile (guest as fallback).

use super::achievement::{achievement_catalog, Achievement};
use super::budget::CategoryBudget;
use super::card::CreditCard;
use super::category::Category;
use super::goal::Goal;
use super::investment::Investment;
use super::notification::{Notification, NotificationKind, MAX_NOTIFICATIONS};
use super::transaction::Transaction;
use super::user::{emails_match, normalize_email, UserId, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot schema version written by this build.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 3;

/// Complete in-memory aggregate persisted as one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialState {
    pub schema_version: u32,
    /// Profile used while no registry user is active.
    pub guest_profile: UserProfile,
    /// Registry reference for the active profile.
    #[serde(default)]
    pub active_user_id: Option<UserId>,
    pub transactions: Vec<Transaction>,
    pub cards: Vec<CreditCard>,
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub investments: Vec<Investment>,
    pub budgets: Vec<CategoryBudget>,
    pub achievements: Vec<Achievement>,
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

impl FinancialState {
    /// Hardcoded first-run aggregate. Welcome notifications are stamped `now`.
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            guest_profile: UserProfile::guest(),
            active_user_id: None,
            transactions: Vec::new(),
            cards: Vec::new(),
            goals: Vec::new(),
            investments: Vec::new(),
            budgets: vec![
                CategoryBudget::new(Category::Food, 1500.0),
                CategoryBudget::new(Category::Leisure, 500.0),
                CategoryBudget::new(Category::Transport, 800.0),
                CategoryBudget::new(Category::Housing, 2500.0),
            ],
            achievements: achievement_catalog(),
            notifications: vec![
                seed_notification(
                    "n1",
                    NotificationKind::Info,
                    "Bem-vindo ao Veridian",
                    "Comece configurando seu orçamento mensal para ter previsões precisas.",
                    now,
                ),
                seed_notification(
                    "n2",
                    NotificationKind::Success,
                    "Meta em Destaque",
                    "Você agora pode escolher qual meta quer acompanhar diretamente no Dashboard.",
                    now,
                ),
            ],
            users: Vec::new(),
        }
    }

    /// Active profile: the referenced registry user, else the guest profile.
    pub fn active_profile(&self) -> &UserProfile {
        self.active_user_id
            .and_then(|id| self.user_by_id(id))
            .unwrap_or(&self.guest_profile)
    }

    /// Mutable access to whichever profile `active_profile()` resolves to.
    pub(crate) fn active_profile_mut(&mut self) -> &mut UserProfile {
        let index = self
            .active_user_id
            .and_then(|id| self.users.iter().position(|user| user.id == id));
        match index {
            Some(index) => &mut self.users[index],
            None => &mut self.guest_profile,
        }
    }

    pub fn user_by_id(&self, id: UserId) -> Option<&UserProfile> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Registry lookup by case-insensitive email.
    pub fn find_user_by_email(&self, email: &str) -> Option<&UserProfile> {
        self.users.iter().find(|user| user.has_email(email))
    }

    /// Featured goal, or the first goal when none is featured.
    pub fn featured_goal(&self) -> Option<&Goal> {
        self.goals
            .iter()
            .find(|goal| goal.is_featured)
            .or_else(|| self.goals.first())
    }

    pub fn budget(&self, category: Category) -> Option<&CategoryBudget> {
        self.budgets.iter().find(|budget| budget.category == category)
    }

    /// Reports the first violated aggregate invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let featured = self.goals.iter().filter(|goal| goal.is_featured).count();
        if featured > 1 {
            return Err(InvariantViolation::MultipleFeaturedGoals(featured));
        }

        let mut emails = HashSet::new();
        for user in &self.users {
            if !emails.insert(normalize_email(&user.email)) {
                return Err(InvariantViolation::DuplicateUserEmail(user.email.clone()));
            }
        }

        let mut categories = HashSet::new();
        for budget in &self.budgets {
            if !categories.insert(budget.category) {
                return Err(InvariantViolation::DuplicateBudgetCategory(budget.category));
            }
        }

        if self.notifications.len() > MAX_NOTIFICATIONS {
            return Err(InvariantViolation::TooManyNotifications(
                self.notifications.len(),
            ));
        }
        if self
            .notifications
            .windows(2)
            .any(|pair| pair[0].date < pair[1].date)
        {
            return Err(InvariantViolation::NotificationsOutOfOrder);
        }

        Ok(())
    }

    /// Repairs invariant violations found in persisted data.
    ///
    /// Keeps the first featured goal, the first budget per category and the
    /// first user per email; sorts notifications newest first and keeps the
    /// newest `MAX_NOTIFICATIONS`. Returns the number of entries touched.
    pub(crate) fn repair(&mut self) -> usize {
        let mut touched = 0;

        let mut featured_seen = false;
        for goal in &mut self.goals {
            if goal.is_featured {
                if featured_seen {
                    goal.is_featured = false;
                    touched += 1;
                }
                featured_seen = true;
            }
        }

        let mut emails = HashSet::new();
        let users_before = self.users.len();
        self.users
            .retain(|user| emails.insert(normalize_email(&user.email)));
        touched += users_before - self.users.len();

        let mut categories = HashSet::new();
        let budgets_before = self.budgets.len();
        self.budgets
            .retain(|budget| categories.insert(budget.category));
        touched += budgets_before - self.budgets.len();

        if self
            .notifications
            .windows(2)
            .any(|pair| pair[0].date < pair[1].date)
        {
            self.notifications
                .sort_by(|left, right| right.date.cmp(&left.date));
            touched += 1;
        }
        if self.notifications.len() > MAX_NOTIFICATIONS {
            touched += self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.truncate(MAX_NOTIFICATIONS);
        }

        touched
    }

    pub(crate) fn email_taken_by_other(&self, email: &str, owner: UserId) -> bool {
        self.users
            .iter()
            .any(|user| user.id != owner && emails_match(&user.email, email))
    }
}

impl Default for FinancialState {
    fn default() -> Self {
        Self::seed(Utc::now())
    }
}

/// Aggregate-wide invariant failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    MultipleFeaturedGoals(usize),
    DuplicateUserEmail(String),
    DuplicateBudgetCategory(Category),
    TooManyNotifications(usize),
    NotificationsOutOfOrder,
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultipleFeaturedGoals(count) => {
                write!(f, "{count} goals are featured; at most one allowed")
            }
            Self::DuplicateUserEmail(email) => write!(f, "duplicate registry email: {email}"),
            Self::DuplicateBudgetCategory(category) => {
                write!(f, "duplicate budget category: {category}")
            }
            Self::TooManyNotifications(count) => write!(
                f,
                "{count} notifications exceed the limit of {MAX_NOTIFICATIONS}"
            ),
            Self::NotificationsOutOfOrder => f.write_str("notifications are not newest-first"),
        }
    }
}

impl Error for InvariantViolation {}

fn seed_notification(
    id: &str,
    kind: NotificationKind,
    title: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
        date: now,
        read: false,
    }
}

#[cfg(test)]
mod tests {
    use super::{FinancialState, InvariantViolation};
    use crate::model::category::Category;
    use crate::model::goal::Goal;
    use crate::model::user::UserProfile;
    use chrono::{NaiveDate, Utc};

    fn goal(title: &str, featured: bool) -> Goal {
        let mut goal = Goal::new(title, 1000.0, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        goal.is_featured = featured;
        goal
    }

    #[test]
    fn seed_satisfies_invariants() {
        let state = FinancialState::seed(Utc::now());
        state.check_invariants().unwrap();
        assert_eq!(state.budgets.len(), 4);
        assert_eq!(state.achievements.len(), 3);
        assert!(state.users.is_empty());
        assert!(state.active_profile().is_guest());
    }

    #[test]
    fn active_profile_falls_back_to_guest_for_dangling_reference() {
        let mut state = FinancialState::seed(Utc::now());
        state.active_user_id = Some(uuid::Uuid::new_v4());
        assert!(state.active_profile().is_guest());
    }

    #[test]
    fn repair_keeps_first_featured_goal_and_first_budget() {
        let mut state = FinancialState::seed(Utc::now());
        state.goals = vec![goal("a", true), goal("b", true), goal("c", false)];
        state
            .budgets
            .push(crate::model::budget::CategoryBudget::new(Category::Food, 1.0));
        state.users.push(UserProfile::register("A", "a@b.com", "x"));
        state.users.push(UserProfile::register("B", "A@B.COM", "y"));

        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::MultipleFeaturedGoals(2))
        );
        assert_eq!(state.repair(), 3);
        state.check_invariants().unwrap();
        assert!(state.goals[0].is_featured);
        assert_eq!(state.budget(Category::Food).unwrap().limit, 1500.0);
        assert_eq!(state.users.len(), 1);
    }

    #[test]
    fn featured_goal_falls_back_to_first_goal() {
        let mut state = FinancialState::seed(Utc::now());
        assert!(state.featured_goal().is_none());
        state.goals = vec![goal("first", false), goal("second", false)];
        assert_eq!(state.featured_goal().unwrap().title, "first");
        state.goals[1].is_featured = true;
        assert_eq!(state.featured_goal().unwrap().title, "second");
    }
}
