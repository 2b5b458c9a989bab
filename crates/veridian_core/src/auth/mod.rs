//! Credential handling and the login session.
//!
//! # Responsibility
//! - Store credentials as salted hashes only.
//! - Track whether a user is signed in for the running process.

pub mod password;
pub mod session;

pub use password::{PasswordHash, PasswordHashError};
pub use session::{LoginError, Session, SessionState, SignUpError};
