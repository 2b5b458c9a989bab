//! Process-local login session.
//!
//! # Responsibility
//! - Drive `Anonymous <-> Authenticated` transitions on top of the store.
//!
//! # Invariants
//! - The session is never persisted; a new process starts `Anonymous`.
//! - Logout clears only the session flag. The active profile reference in
//!   the aggregate is left as is.
//! - A failed login leaves both the session and the aggregate unchanged.

use crate::model::user::{UserId, UserProfile};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::store::FinanceStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated { user_id: UserId },
}

/// Why a login attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    UnknownEmail,
    WrongPassword,
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEmail => f.write_str("no registered user with that email"),
            Self::WrongPassword => f.write_str("password does not match"),
        }
    }
}

impl Error for LoginError {}

/// Why a sign-up was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpError {
    EmailTaken,
    BlankEmail,
    /// Registration succeeded but the follow-up login did not.
    Login(LoginError),
}

impl Display for SignUpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailTaken => f.write_str("email is already registered"),
            Self::BlankEmail => f.write_str("email cannot be blank"),
            Self::Login(err) => write!(f, "automatic login failed: {err}"),
        }
    }
}

impl Error for SignUpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Login(err) => Some(err),
            Self::EmailTaken | Self::BlankEmail => None,
        }
    }
}

impl From<LoginError> for SignUpError {
    fn from(value: LoginError) -> Self {
        Self::Login(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self.state {
            SessionState::Authenticated { user_id } => Some(user_id),
            SessionState::Anonymous => None,
        }
    }

    /// Validates credentials through the store and authenticates on success.
    ///
    /// # Errors
    /// - `UnknownEmail` when no registry user has `email`.
    /// - `WrongPassword` when the password does not verify.
    pub fn login<R: SnapshotRepository>(
        &mut self,
        store: &mut FinanceStore<R>,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, LoginError> {
        let Some(user) = store.validate_login(email, password) else {
            return Err(if store.find_user_by_email(email).is_some() {
                LoginError::WrongPassword
            } else {
                LoginError::UnknownEmail
            });
        };

        self.state = SessionState::Authenticated { user_id: user.id };
        info!("event=session_login module=auth status=ok");
        Ok(user)
    }

    /// Registers a new user and signs them in with the same credentials.
    ///
    /// # Errors
    /// - `BlankEmail` for an empty email.
    /// - `EmailTaken` when the email is already registered; nothing changes.
    pub fn sign_up<R: SnapshotRepository>(
        &mut self,
        store: &mut FinanceStore<R>,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, SignUpError> {
        if email.trim().is_empty() {
            return Err(SignUpError::BlankEmail);
        }
        if store.find_user_by_email(email).is_some() {
            return Err(SignUpError::EmailTaken);
        }

        store.register_user(UserProfile::register(name, email, password));
        info!("event=session_sign_up module=auth status=ok");
        self.login(store, email, password)
            .map_err(SignUpError::from)
    }

    pub fn logout(&mut self) {
        if self.is_authenticated() {
            info!("event=session_logout module=auth status=ok");
        }
        self.state = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::{LoginError, Session, SessionState, SignUpError};
    use crate::model::state::FinancialState;
    use crate::repo::snapshot_repo::MemorySnapshotRepository;
    use crate::store::FinanceStore;
    use chrono::Utc;

    fn store() -> FinanceStore<MemorySnapshotRepository> {
        FinanceStore::with_state(
            MemorySnapshotRepository::new("session-test"),
            FinancialState::seed(Utc::now()),
        )
    }

    #[test]
    fn new_session_is_anonymous() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.user_id().is_none());
    }

    #[test]
    fn login_distinguishes_unknown_email_from_wrong_password() {
        let mut store = store();
        let mut session = Session::new();
        session
            .sign_up(&mut store, "Ana", "ana@x.com", "secret")
            .unwrap();
        session.logout();

        assert_eq!(
            session.login(&mut store, "bob@x.com", "secret"),
            Err(LoginError::UnknownEmail)
        );
        assert_eq!(
            session.login(&mut store, "ana@x.com", "SECRET"),
            Err(LoginError::WrongPassword)
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn sign_up_rejects_blank_and_taken_emails() {
        let mut store = store();
        let mut session = Session::new();
        assert_eq!(
            session.sign_up(&mut store, "Nobody", "  ", "pw").unwrap_err(),
            SignUpError::BlankEmail
        );

        session
            .sign_up(&mut store, "Ana", "ana@x.com", "secret")
            .unwrap();
        assert_eq!(
            session
                .sign_up(&mut store, "Other", "ANA@x.com", "pw")
                .unwrap_err(),
            SignUpError::EmailTaken
        );
        assert_eq!(store.state().users.len(), 1);
    }

    #[test]
    fn logout_keeps_active_profile_reference() {
        let mut store = store();
        let mut session = Session::new();
        let user = session
            .sign_up(&mut store, "Ana", "ana@x.com", "secret")
            .unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(store.state().active_user_id, Some(user.id));
    }
}
