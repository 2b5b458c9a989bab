//! Finance store: the operation surface consumers call.
//!
//! # Responsibility
//! - Own the current aggregate for the lifetime of the process.
//! - Validate entity payloads, build commands, commit reducer results.
//! - Persist the aggregate after every committed change.
//!
//! # Invariants
//! - No mutation bypasses the reducer, and commands are built only here.
//! - Entity ids are unique within their collection.
//! - Persistence runs only when a command changed the aggregate.
//! - Persistence failures never reach the caller of a mutation.

use super::command::Command;
use super::reducer::{reduce, Transition};
use super::view::CoachingSnapshot;
use crate::auth::password::PasswordHash;
use crate::model::budget::validate_budget_limit;
use crate::model::card::CreditCard;
use crate::model::category::Category;
use crate::model::goal::Goal;
use crate::model::investment::Investment;
use crate::model::notification::NotificationDraft;
use crate::model::state::FinancialState;
use crate::model::transaction::Transaction;
use crate::model::user::{ProfilePatch, UserProfile};
use crate::model::validation::{require_unused_id, ValidationError};
use crate::persistence;
use crate::repo::snapshot_repo::SnapshotRepository;
use chrono::Utc;
use log::{debug, info, warn};

/// In-memory aggregate plus the slot it is persisted to.
///
/// Raw commands are not reachable from outside the crate; every mutation
/// goes through a named operation.
///
/// ```compile_fail
/// use veridian_core::store::command::Command;
/// ```
pub struct FinanceStore<R: SnapshotRepository> {
    repo: R,
    state: FinancialState,
}

impl<R: SnapshotRepository> FinanceStore<R> {
    /// Initializes the store from the persisted snapshot or the seed default.
    pub fn open(repo: R) -> Self {
        let state = persistence::load(&repo);
        info!(
            "event=store_open module=store status=ok slot={} users={} transactions={}",
            repo.slot_key(),
            state.users.len(),
            state.transactions.len()
        );
        Self { repo, state }
    }

    /// Starts from a caller-provided aggregate without reading the slot.
    pub fn with_state(repo: R, state: FinancialState) -> Self {
        Self { repo, state }
    }

    /// Current aggregate snapshot.
    pub fn state(&self) -> &FinancialState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Runs one command through the reducer and commits the result,
    /// persisting when the aggregate changed.
    fn dispatch(&mut self, command: Command) -> bool {
        let label = command.label();
        let Transition { state, changed } = reduce(self.state.clone(), command);
        if changed {
            self.state = state;
            persistence::save(&self.repo, &self.state);
        }
        debug!(
            "event=store_dispatch module=store status=ok command={} changed={}",
            label, changed
        );
        changed
    }

    /// Writes the current aggregate regardless of pending changes.
    ///
    /// Hosts call this once before shutdown.
    pub fn flush(&self) {
        persistence::save(&self.repo, &self.state);
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), ValidationError> {
        transaction.validate()?;
        let taken = self.state.transactions.iter().any(|t| t.id == transaction.id);
        require_unused_id("transaction.id", &transaction.id, taken)?;
        self.dispatch(Command::AddTransaction(transaction));
        Ok(())
    }

    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<(), ValidationError> {
        transaction.validate()?;
        self.dispatch(Command::UpdateTransaction(transaction));
        Ok(())
    }

    pub fn remove_transaction(&mut self, id: &str) {
        self.dispatch(Command::RemoveTransaction(id.to_string()));
    }

    pub fn add_card(&mut self, card: CreditCard) -> Result<(), ValidationError> {
        card.validate()?;
        let taken = self.state.cards.iter().any(|c| c.id == card.id);
        require_unused_id("card.id", &card.id, taken)?;
        self.dispatch(Command::AddCard(card));
        Ok(())
    }

    pub fn update_card(&mut self, card: CreditCard) -> Result<(), ValidationError> {
        card.validate()?;
        self.dispatch(Command::UpdateCard(card));
        Ok(())
    }

    pub fn remove_card(&mut self, id: &str) {
        self.dispatch(Command::RemoveCard(id.to_string()));
    }

    /// Adds a goal; a featured goal takes the flag from every other goal.
    pub fn add_goal(&mut self, goal: Goal) -> Result<(), ValidationError> {
        goal.validate()?;
        let taken = self.state.goals.iter().any(|g| g.id == goal.id);
        require_unused_id("goal.id", &goal.id, taken)?;
        self.dispatch(Command::AddGoal(goal));
        Ok(())
    }

    pub fn update_goal(&mut self, goal: Goal) -> Result<(), ValidationError> {
        goal.validate()?;
        self.dispatch(Command::UpdateGoal(goal));
        Ok(())
    }

    /// Removes a goal. Investments pointing at it keep their `goal_id`.
    pub fn remove_goal(&mut self, id: &str) {
        self.dispatch(Command::RemoveGoal(id.to_string()));
    }

    pub fn add_investment(&mut self, investment: Investment) -> Result<(), ValidationError> {
        investment.validate()?;
        let taken = self.state.investments.iter().any(|i| i.id == investment.id);
        require_unused_id("investment.id", &investment.id, taken)?;
        self.dispatch(Command::AddInvestment(investment));
        Ok(())
    }

    pub fn update_investment(&mut self, investment: Investment) -> Result<(), ValidationError> {
        investment.validate()?;
        self.dispatch(Command::UpdateInvestment(investment));
        Ok(())
    }

    pub fn remove_investment(&mut self, id: &str) {
        self.dispatch(Command::RemoveInvestment(id.to_string()));
    }

    /// Merges `patch` into the active profile.
    ///
    /// An email already used by another registry user is ignored.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<(), ValidationError> {
        patch.validate()?;
        if !patch.is_empty() {
            self.dispatch(Command::UpdateProfile(patch));
        }
        Ok(())
    }

    /// Appends `user` to the registry; silently ignored when the email or
    /// the id is already registered.
    pub fn register_user(&mut self, user: UserProfile) {
        if !self.dispatch(Command::RegisterUser(user)) {
            debug!("event=register_user module=store status=skipped reason=duplicate_or_guest");
        }
    }

    /// Checks credentials and switches the active profile on success.
    ///
    /// Email matching ignores case; the password check does not. The
    /// returned profile carries no credential. Returns `None` on failure and
    /// leaves the aggregate unchanged. Use
    /// [`FinanceStore::find_user_by_email`] to tell an unknown email from a
    /// wrong password.
    pub fn validate_login(&mut self, email: &str, password: &str) -> Option<UserProfile> {
        let user = self
            .state
            .users
            .iter()
            .find(|user| {
                user.has_email(email)
                    && user
                        .password_hash
                        .as_ref()
                        .is_some_and(|hash| hash.verify(password))
            })
            .cloned();

        match user {
            Some(user) => {
                self.dispatch(Command::ActivateUser(user.id));
                info!("event=login module=auth status=ok");
                Some(user.without_credential())
            }
            None => {
                info!("event=login module=auth status=rejected");
                None
            }
        }
    }

    /// Replaces the active user's password after checking the current one.
    ///
    /// Returns `false` for the guest profile or a wrong current password.
    pub fn change_password(&mut self, current: &str, new_password: &str) -> bool {
        let profile = self.state.active_profile();
        let verified = !profile.is_guest()
            && profile
                .password_hash
                .as_ref()
                .is_some_and(|hash| hash.verify(current));
        if !verified {
            warn!("event=change_password module=auth status=rejected");
            return false;
        }

        let user_id = profile.id;
        self.dispatch(Command::SetPasswordHash {
            user_id,
            hash: PasswordHash::derive(new_password),
        })
    }

    /// Sets the limit of an existing budget; unknown categories are ignored.
    pub fn update_budget(&mut self, category: Category, limit: f64) -> Result<(), ValidationError> {
        validate_budget_limit(limit)?;
        self.dispatch(Command::UpdateBudget { category, limit });
        Ok(())
    }

    pub fn unlock_achievement(&mut self, id: &str) {
        self.dispatch(Command::UnlockAchievement(id.to_string()));
    }

    pub fn mark_notifications_read(&mut self) {
        self.dispatch(Command::MarkNotificationsRead);
    }

    /// Stamps `draft` with an id and the current time and prepends it,
    /// keeping only the newest entries.
    pub fn add_notification(&mut self, draft: NotificationDraft) {
        let notification = draft.into_notification(Utc::now());
        self.dispatch(Command::AddNotification(notification));
    }

    pub fn active_profile(&self) -> &UserProfile {
        self.state.active_profile()
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&UserProfile> {
        self.state.find_user_by_email(email)
    }

    pub fn featured_goal(&self) -> Option<&Goal> {
        self.state.featured_goal()
    }

    /// Detached read-only view for the coaching assistant.
    pub fn coaching_snapshot(&self) -> CoachingSnapshot {
        CoachingSnapshot::capture(&self.state)
    }
}
