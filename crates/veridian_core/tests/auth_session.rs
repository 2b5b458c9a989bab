use chrono::Utc;
use veridian_core::model::user::UserProfile;
use veridian_core::{
    FinanceStore, FinancialState, LoginError, MemorySnapshotRepository, Session, SessionState,
};

fn store_with_user(email: &str, password: &str) -> FinanceStore<MemorySnapshotRepository> {
    let mut store = FinanceStore::with_state(
        MemorySnapshotRepository::new("auth-test"),
        FinancialState::seed(Utc::now()),
    );
    store.register_user(UserProfile::register("Ana", email, password));
    store
}

#[test]
fn login_matches_email_case_insensitively() {
    let mut store = store_with_user("a@b.com", "secret");

    let user = store
        .validate_login("A@B.com", "secret")
        .expect("login should succeed");
    assert_eq!(user.email, "a@b.com");
    assert!(user.password_hash.is_none());
    assert_eq!(store.active_profile().id, user.id);
    assert_eq!(store.state().active_user_id, Some(user.id));
}

#[test]
fn wrong_password_case_fails_and_keeps_active_profile() {
    let mut store = store_with_user("a@b.com", "secret");
    let before = store.state().clone();
    let writes = store.repository().write_count();

    assert!(store.validate_login("a@b.com", "Secret").is_none());
    assert!(store.active_profile().is_guest());
    assert_eq!(store.state(), &before);
    assert_eq!(store.repository().write_count(), writes);
}

#[test]
fn stored_credential_is_not_the_raw_password() {
    let store = store_with_user("a@b.com", "secret");
    let payload = store.repository().payload().expect("registration persisted");

    assert!(!payload.contains("\"secret\""));
    assert!(payload.contains("passwordHash"));
}

#[test]
fn session_sign_up_logs_in_and_logout_only_clears_flag() {
    let mut store = FinanceStore::with_state(
        MemorySnapshotRepository::new("auth-test"),
        FinancialState::seed(Utc::now()),
    );
    let mut session = Session::new();

    let user = session
        .sign_up(&mut store, "Bruno", "Bruno@Mail.com", "hunter2")
        .expect("sign up should succeed");
    assert!(user.password_hash.is_none());
    assert_eq!(session.state(), SessionState::Authenticated { user_id: user.id });
    assert_eq!(store.active_profile().name, "Bruno");

    let persisted = store.state().clone();
    session.logout();
    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(store.state(), &persisted);

    session
        .login(&mut store, "bruno@mail.com", "hunter2")
        .expect("login after logout should succeed");
    assert!(session.is_authenticated());
}

#[test]
fn session_login_reports_failure_reason() {
    let mut store = store_with_user("a@b.com", "secret");
    let mut session = Session::new();

    assert_eq!(
        session.login(&mut store, "nobody@b.com", "secret"),
        Err(LoginError::UnknownEmail)
    );
    assert_eq!(
        session.login(&mut store, "a@b.com", "wrong"),
        Err(LoginError::WrongPassword)
    );
    assert_eq!(session.state(), SessionState::Anonymous);
}

#[test]
fn change_password_requires_current_password() {
    let mut store = store_with_user("a@b.com", "secret");
    assert!(!store.change_password("secret", "next"), "guest cannot change");

    store.validate_login("a@b.com", "secret").unwrap();
    assert!(!store.change_password("wrong", "next"));
    assert!(store.change_password("secret", "next"));

    assert!(store.validate_login("a@b.com", "secret").is_none());
    assert!(store.validate_login("a@b.com", "next").is_some());
}

#[test]
fn profile_email_cannot_collide_with_another_user() {
    let mut store = store_with_user("a@b.com", "secret");
    store.register_user(UserProfile::register("Bia", "bia@b.com", "pw"));
    store.validate_login("bia@b.com", "pw").unwrap();

    store.update_profile(veridian_core::model::user::ProfilePatch {
        email: Some("A@B.COM".to_string()),
        name: Some("Beatriz".to_string()),
        ..Default::default()
    })
    .unwrap();

    let profile = store.active_profile();
    assert_eq!(profile.email, "bia@b.com");
    assert_eq!(profile.name, "Beatriz");
    store.state().check_invariants().unwrap();
}

#[test]
fn switching_users_requires_their_password() {
    let mut store = store_with_user("a@b.com", "secret");
    store.register_user(UserProfile::register("Bia", "bia@b.com", "pw"));
    store.validate_login("a@b.com", "secret").unwrap();
    let ana_id = store.active_profile().id;

    assert!(store.validate_login("bia@b.com", "secret").is_none());
    assert_eq!(store.active_profile().id, ana_id);
    assert!(!store.change_password("pw", "stolen"));

    let bia = store.validate_login("bia@b.com", "pw").unwrap();
    assert_eq!(store.active_profile().id, bia.id);
}
