//! User profile and registry entry model.
//!
//! # Responsibility
//! - Define the single stored copy of every known profile.
//! - Provide the email matching rule used for registry uniqueness.
//!
//! # Invariants
//! - Emails are unique across the registry when compared case-insensitively.
//! - Only a salted password hash is stored, never the raw secret.
//! - The guest profile uses the nil id and never appears in the registry.

use super::validation::{require_non_negative, ValidationError};
use crate::auth::password::PasswordHash;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a registered user.
pub type UserId = Uuid;

const GUEST_NAME: &str = "Visitante";
const DEFAULT_FINANCIAL_GOAL: &str = "Organização Geral";
const DEFAULT_SAVINGS_TARGET: f64 = 500.0;

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanTier {
    #[default]
    Free,
    Premium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<PasswordHash>,
    pub monthly_income: f64,
    #[serde(default = "default_financial_goal")]
    pub financial_goal: String,
    pub monthly_savings_target: f64,
    #[serde(default)]
    pub plan: PlanTier,
    /// Image reference or data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Anonymous default profile shown before anyone signs in.
    pub fn guest() -> Self {
        Self {
            id: Uuid::nil(),
            name: GUEST_NAME.to_string(),
            email: String::new(),
            password_hash: None,
            monthly_income: 0.0,
            financial_goal: DEFAULT_FINANCIAL_GOAL.to_string(),
            monthly_savings_target: DEFAULT_SAVINGS_TARGET,
            plan: PlanTier::Free,
            avatar: None,
        }
    }

    /// Builds a registry entry for a sign-up, hashing the password.
    ///
    /// The email is stored trimmed and lowercased.
    pub fn register(name: impl Into<String>, email: &str, password: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: normalize_email(email),
            password_hash: Some(PasswordHash::derive(password)),
            ..Self::guest()
        }
    }

    pub fn is_guest(&self) -> bool {
        self.id.is_nil()
    }

    pub fn has_email(&self, email: &str) -> bool {
        emails_match(&self.email, email)
    }

    /// Copy safe to hand outside the core: the credential is dropped.
    pub fn without_credential(&self) -> Self {
        Self {
            password_hash: None,
            ..self.clone()
        }
    }
}

/// Partial update for the active profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub monthly_income: Option<f64>,
    pub financial_goal: Option<String>,
    pub monthly_savings_target: Option<f64>,
    pub plan: Option<PlanTier>,
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Rejects amounts that are not finite or below zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(income) = self.monthly_income {
            require_non_negative("profile.monthlyIncome", income)?;
        }
        if let Some(target) = self.monthly_savings_target {
            require_non_negative("profile.monthlySavingsTarget", target)?;
        }
        Ok(())
    }

    /// Merges set fields into `profile`.
    ///
    /// Returns whether any field actually changed.
    pub fn apply_to(&self, profile: &mut UserProfile) -> bool {
        let before = profile.clone();
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(email) = &self.email {
            profile.email = normalize_email(email);
        }
        if let Some(income) = self.monthly_income {
            profile.monthly_income = income;
        }
        if let Some(goal) = &self.financial_goal {
            profile.financial_goal = goal.clone();
        }
        if let Some(target) = self.monthly_savings_target {
            profile.monthly_savings_target = target;
        }
        if let Some(plan) = self.plan {
            profile.plan = plan;
        }
        if let Some(avatar) = &self.avatar {
            profile.avatar = Some(avatar.clone());
        }
        *profile != before
    }
}

/// Canonical stored form of an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Case-insensitive email comparison used for registry lookups.
pub fn emails_match(left: &str, right: &str) -> bool {
    normalize_email(left) == normalize_email(right)
}

fn default_financial_goal() -> String {
    DEFAULT_FINANCIAL_GOAL.to_string()
}
