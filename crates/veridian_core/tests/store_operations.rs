use chrono::{NaiveDate, Utc};
use veridian_core::model::card::{CardBrand, CreditCard};
use veridian_core::model::category::Category;
use veridian_core::model::goal::Goal;
use veridian_core::model::investment::{Investment, InvestmentType};
use veridian_core::model::notification::{NotificationDraft, NotificationKind};
use veridian_core::model::transaction::{Transaction, TransactionType};
use veridian_core::model::user::{PlanTier, ProfilePatch, UserProfile};
use veridian_core::{FinanceStore, FinancialState, MemorySnapshotRepository, ValidationError};

fn fresh_store() -> FinanceStore<MemorySnapshotRepository> {
    FinanceStore::with_state(
        MemorySnapshotRepository::new("store-test"),
        FinancialState::seed(Utc::now()),
    )
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn goal(title: &str, featured: bool) -> Goal {
    let mut goal = Goal::new(title, 10_000.0, date(2030, 12, 31));
    goal.is_featured = featured;
    goal
}

fn expense(description: &str, amount: f64) -> Transaction {
    Transaction::new(
        description,
        amount,
        date(2025, 3, 10),
        Category::Food,
        TransactionType::Expense,
    )
}

#[test]
fn transactions_are_prepended_and_updated_by_id() {
    let mut store = fresh_store();
    let first = expense("Mercado", 120.0);
    let second = expense("Padaria", 15.5);
    store.add_transaction(first.clone()).unwrap();
    store.add_transaction(second.clone()).unwrap();

    let ids: Vec<_> = store.state().transactions.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

    let mut edited = first.clone();
    edited.amount = 130.0;
    store.update_transaction(edited).unwrap();
    assert_eq!(store.state().transactions[1].amount, 130.0);

    store.remove_transaction(&second.id);
    assert_eq!(store.state().transactions.len(), 1);
    assert_eq!(store.state().transactions[0].id, first.id);
}

#[test]
fn unknown_ids_leave_state_and_slot_untouched() {
    let mut store = fresh_store();
    let before = store.state().clone();

    store.update_transaction(expense("ghost", 1.0)).unwrap();
    store.remove_transaction("missing");
    store.remove_card("missing");
    store.remove_goal("missing");
    store.remove_investment("missing");
    store.update_goal(goal("ghost", true)).unwrap();
    store.unlock_achievement("missing");

    assert_eq!(store.state(), &before);
    assert_eq!(store.repository().write_count(), 0);
}

#[test]
fn every_change_writes_the_snapshot_once() {
    let mut store = fresh_store();
    store.add_card(CreditCard::new("Black", "Nubank", CardBrand::Mastercard, 5000.0, 3, 10))
        .unwrap();
    assert_eq!(store.repository().write_count(), 1);

    let saved: FinancialState =
        serde_json::from_str(&store.repository().payload().unwrap()).unwrap();
    assert_eq!(&saved, store.state());
}

#[test]
fn at_most_one_goal_stays_featured() {
    let mut store = fresh_store();
    let a = goal("Viagem", true);
    let b = goal("Carro", false);
    let c = goal("Casa", true);
    store.add_goal(a.clone()).unwrap();
    store.add_goal(b.clone()).unwrap();
    store.add_goal(c.clone()).unwrap();
    assert_eq!(store.featured_goal().unwrap().id, c.id);

    let mut b_featured = b.clone();
    b_featured.is_featured = true;
    store.update_goal(b_featured).unwrap();

    let featured: Vec<_> = store
        .state()
        .goals
        .iter()
        .filter(|goal| goal.is_featured)
        .map(|goal| goal.id.clone())
        .collect();
    assert_eq!(featured, vec![b.id.clone()]);
    store.state().check_invariants().unwrap();
}

#[test]
fn removing_a_goal_keeps_dangling_investment_reference() {
    let mut store = fresh_store();
    let target = goal("Aposentadoria", false);
    store.add_goal(target.clone()).unwrap();

    let mut position = Investment::new("Tesouro", InvestmentType::FixedIncome, 1000.0, date(2024, 1, 2));
    position.goal_id = Some(target.id.clone());
    store.add_investment(position.clone()).unwrap();

    store.remove_goal(&target.id);
    assert!(store.state().goals.is_empty());
    assert_eq!(
        store.state().investments[0].goal_id.as_deref(),
        Some(target.id.as_str())
    );
}

#[test]
fn notifications_keep_the_twenty_newest_first() {
    let mut store = fresh_store();
    for index in 0..25 {
        store.add_notification(NotificationDraft::new(
            NotificationKind::Info,
            format!("n-{index}"),
            "mensagem",
        ));
    }

    let titles: Vec<_> = store
        .state()
        .notifications
        .iter()
        .map(|n| n.title.clone())
        .collect();
    let expected: Vec<_> = (5..25).rev().map(|index| format!("n-{index}")).collect();
    assert_eq!(titles, expected);
    assert!(store.state().notifications.iter().all(|n| !n.read));
}

#[test]
fn marking_notifications_read_is_idempotent() {
    let mut store = fresh_store();
    store.mark_notifications_read();
    let once = store.state().clone();
    let writes = store.repository().write_count();

    store.mark_notifications_read();
    assert_eq!(store.state(), &once);
    assert_eq!(store.repository().write_count(), writes);
    assert!(store.state().notifications.iter().all(|n| n.read));
}

#[test]
fn duplicate_registration_is_ignored_case_insensitively() {
    let mut store = fresh_store();
    store.register_user(UserProfile::register("Ana", "a@b.com", "secret"));
    store.register_user(UserProfile::register("Outra", "A@B.com", "other"));

    assert_eq!(store.state().users.len(), 1);
    assert_eq!(store.state().users[0].name, "Ana");
}

#[test]
fn budget_updates_only_touch_existing_categories() {
    let mut store = fresh_store();
    store.update_budget(Category::Food, 1800.0).unwrap();
    assert_eq!(store.state().budget(Category::Food).unwrap().limit, 1800.0);
    assert_eq!(store.state().budget(Category::Food).unwrap().spent, 0.0);

    let before = store.state().clone();
    store.update_budget(Category::Health, 300.0).unwrap();
    assert_eq!(store.state(), &before);
}

#[test]
fn achievements_unlock_once() {
    let mut store = fresh_store();
    store.unlock_achievement("1");
    let writes = store.repository().write_count();
    store.unlock_achievement("1");

    assert!(store.state().achievements.iter().any(|a| a.id == "1" && a.unlocked));
    assert_eq!(store.repository().write_count(), writes);
}

#[test]
fn invalid_payloads_are_rejected_without_changes() {
    let mut store = fresh_store();
    let before = store.state().clone();

    assert!(matches!(
        store.add_transaction(expense("zero", 0.0)),
        Err(ValidationError::NotPositive { .. })
    ));
    assert!(matches!(
        store.add_transaction(expense("nan", f64::NAN)),
        Err(ValidationError::NonFinite { .. })
    ));
    assert!(matches!(
        store.add_card(CreditCard::new("Card", "Bank", CardBrand::Visa, 100.0, 0, 10)),
        Err(ValidationError::DayOutOfRange { .. })
    ));
    assert!(matches!(
        store.add_investment(Investment::new("x", InvestmentType::Crypto, -1.0, date(2024, 1, 1))),
        Err(ValidationError::Negative { .. })
    ));
    assert!(store.update_budget(Category::Food, f64::INFINITY).is_err());

    assert_eq!(store.state(), &before);
    assert_eq!(store.repository().write_count(), 0);
}

#[test]
fn profile_patch_merges_into_active_profile() {
    let mut store = fresh_store();
    store.update_profile(ProfilePatch {
        name: Some("Marina".to_string()),
        monthly_income: Some(6500.0),
        plan: Some(PlanTier::Premium),
        ..ProfilePatch::default()
    })
    .unwrap();

    let profile = store.active_profile();
    assert_eq!(profile.name, "Marina");
    assert_eq!(profile.monthly_income, 6500.0);
    assert_eq!(profile.plan, PlanTier::Premium);
    assert_eq!(profile.monthly_savings_target, 500.0);
}

#[test]
fn coaching_snapshot_omits_credentials() {
    let mut store = fresh_store();
    store.register_user(UserProfile::register("Ana", "ana@x.com", "secret"));
    store.validate_login("ana@x.com", "secret").unwrap();
    store.add_goal(goal("Reserva", true)).unwrap();

    let snapshot = store.coaching_snapshot();
    assert_eq!(snapshot.profile.name, "Ana");
    assert_eq!(snapshot.goals.len(), 1);
    assert_eq!(snapshot.budgets.len(), 4);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(!json.contains("ana@x.com"));
    assert!(!json.contains("pbkdf2-sha256$"));
}

#[test]
fn non_finite_profile_amounts_are_rejected_and_snapshot_still_loads() {
    let mut store = fresh_store();
    store.register_user(UserProfile::register("Ana", "ana@x.com", "secret"));
    store.validate_login("ana@x.com", "secret").unwrap();

    for patch in [
        ProfilePatch {
            monthly_income: Some(f64::NAN),
            ..ProfilePatch::default()
        },
        ProfilePatch {
            monthly_savings_target: Some(f64::INFINITY),
            ..ProfilePatch::default()
        },
    ] {
        assert!(matches!(
            store.update_profile(patch),
            Err(ValidationError::NonFinite { .. })
        ));
    }

    let payload = store.repository().payload().unwrap();
    assert!(!payload.contains("null"));
    let reloaded = FinanceStore::open(MemorySnapshotRepository::with_payload("reload", payload));
    assert_eq!(reloaded.state(), store.state());
    assert_eq!(reloaded.state().users.len(), 1);
}

#[test]
fn adds_reject_ids_already_in_use() {
    let mut store = fresh_store();
    let tx = expense("Mercado", 50.0);
    store.add_transaction(tx.clone()).unwrap();
    assert!(matches!(
        store.add_transaction(tx),
        Err(ValidationError::DuplicateId { field: "transaction.id", .. })
    ));

    let card = CreditCard::new("Black", "Nubank", CardBrand::Visa, 100.0, 3, 10);
    store.add_card(card.clone()).unwrap();
    assert!(store.add_card(card).is_err());

    let position = Investment::new("CDB", InvestmentType::FixedIncome, 10.0, date(2024, 5, 1));
    store.add_investment(position.clone()).unwrap();
    assert!(store.add_investment(position).is_err());

    assert_eq!(store.state().transactions.len(), 1);
    assert_eq!(store.state().cards.len(), 1);
    assert_eq!(store.state().investments.len(), 1);
}

#[test]
fn featured_goal_stays_unique_across_mixed_sequences() {
    let mut store = fresh_store();
    let first = goal("Viagem", false);
    let mut clash = goal("Carro", true);
    clash.id = first.id.clone();

    store.add_goal(first.clone()).unwrap();
    assert!(matches!(
        store.add_goal(clash),
        Err(ValidationError::DuplicateId { field: "goal.id", .. })
    ));

    let second = goal("Casa", true);
    let third = goal("Reserva", false);
    store.add_goal(second.clone()).unwrap();
    store.add_goal(third.clone()).unwrap();

    let mut first_featured = first.clone();
    first_featured.is_featured = true;
    let mut third_featured = third.clone();
    third_featured.is_featured = true;
    let mut third_plain = third.clone();
    third_plain.current_amount = 25.0;

    for step in [first_featured, third_featured, third_plain] {
        store.update_goal(step).unwrap();
        let featured = store.state().goals.iter().filter(|g| g.is_featured).count();
        assert!(featured <= 1, "featured goals: {featured}");
        store.state().check_invariants().unwrap();
    }
    store.add_goal(goal("Moto", true)).unwrap();
    assert_eq!(store.featured_goal().unwrap().title, "Moto");
    assert_eq!(store.state().goals.iter().filter(|g| g.is_featured).count(), 1);
}

#[test]
fn registering_a_taken_user_id_is_ignored() {
    let mut store = fresh_store();
    let ana = UserProfile::register("Ana", "ana@x.com", "secret");
    store.register_user(ana.clone());

    let mut other = UserProfile::register("Bia", "bia@x.com", "pw");
    other.id = ana.id;
    store.register_user(other);

    assert_eq!(store.state().users.len(), 1);
    assert!(store.find_user_by_email("bia@x.com").is_none());
    assert_eq!(store.state().user_by_id(ana.id).unwrap().name, "Ana");
}
