//! Snapshot schema upgrades.
//!
//! # Responsibility
//! - Bring older snapshot payloads up to `SNAPSHOT_SCHEMA_VERSION` before
//!   they are decoded into `FinancialState`.
//!
//! # Invariants
//! - Upgrades run in strictly increasing `from_version` order.
//! - Payloads without `schemaVersion` are treated as version 1.
//! - Each applied upgrade bumps `schemaVersion` by exactly one.
//! - Plaintext passwords never survive an upgrade.

use super::SnapshotError;
use crate::auth::password::PasswordHash;
use crate::model::category::Category;
use crate::model::state::SNAPSHOT_SCHEMA_VERSION;
use crate::model::user::{emails_match, UserProfile};
use log::info;
use serde_json::{Map, Value};
use uuid::Uuid;

const VERSION_FIELD: &str = "schemaVersion";
const LEGACY_VERSION: u64 = 1;

type Object = Map<String, Value>;

#[derive(Clone, Copy)]
struct SnapshotUpgrade {
    from_version: u32,
    name: &'static str,
    apply: fn(&mut Object),
}

const UPGRADES: &[SnapshotUpgrade] = &[
    SnapshotUpgrade {
        from_version: 1,
        name: "backfill_collections",
        apply: backfill_collections,
    },
    SnapshotUpgrade {
        from_version: 2,
        name: "normalize_registry",
        apply: normalize_registry,
    },
];

/// Latest snapshot schema version known by this binary.
pub fn latest_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

/// Upgrades `value` in place and returns the version it started at.
pub fn upgrade_snapshot(value: &mut Value) -> Result<u64, SnapshotError> {
    let object = value.as_object_mut().ok_or(SnapshotError::NotAnObject)?;
    let from_version = match object.get(VERSION_FIELD) {
        None | Some(Value::Null) => LEGACY_VERSION,
        Some(raw) => raw
            .as_u64()
            .filter(|version| *version >= LEGACY_VERSION)
            .ok_or_else(|| SnapshotError::InvalidVersion(raw.to_string()))?,
    };

    let latest = latest_version();
    if from_version > u64::from(latest) {
        return Err(SnapshotError::UnsupportedVersion {
            snapshot_version: from_version,
            latest_supported: latest,
        });
    }

    for upgrade in UPGRADES {
        if u64::from(upgrade.from_version) < from_version {
            continue;
        }
        (upgrade.apply)(object);
        let to_version = upgrade.from_version + 1;
        object.insert(VERSION_FIELD.to_string(), Value::from(to_version));
        info!(
            "event=snapshot_upgrade module=persistence status=ok step={} to_version={}",
            upgrade.name, to_version
        );
    }

    Ok(from_version)
}

/// v1 -> v2: collections added after the first release.
fn backfill_collections(object: &mut Object) {
    for key in ["users", "investments"] {
        if !matches!(object.get(key), Some(Value::Array(_))) {
            object.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }
}

/// v2 -> v3: enumerated categories, registry ids, hashed passwords and the
/// active profile as a registry reference.
fn normalize_registry(object: &mut Object) {
    normalize_categories(object, "transactions");
    normalize_categories(object, "budgets");

    if let Some(Value::Array(users)) = object.get_mut("users") {
        for user in users.iter_mut().filter_map(Value::as_object_mut) {
            normalize_user_entry(user, None);
        }
    }

    let legacy_profile = object.remove("profile");
    if object.contains_key("guestProfile") {
        return;
    }

    let mut guest = serde_json::to_value(UserProfile::guest()).unwrap_or_default();
    if let Some(Value::Object(mut profile)) = legacy_profile {
        let email = profile
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match registry_id_for_email(object, &email) {
            Some(user_id) => {
                object.insert("activeUserId".to_string(), Value::String(user_id));
            }
            None => {
                normalize_user_entry(&mut profile, Some(Uuid::nil()));
                profile.remove("passwordHash");
                guest = Value::Object(profile);
            }
        }
    }
    object.insert("guestProfile".to_string(), guest);
}

fn normalize_categories(object: &mut Object, collection: &str) {
    let Some(Value::Array(items)) = object.get_mut(collection) else {
        return;
    };
    for entry in items.iter_mut().filter_map(Value::as_object_mut) {
        let category = entry
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::from_label)
            .unwrap_or(Category::General);
        entry.insert(
            "category".to_string(),
            Value::String(category.label().to_string()),
        );
    }
}

fn normalize_user_entry(user: &mut Object, forced_id: Option<Uuid>) {
    let id = forced_id.unwrap_or_else(|| {
        user.get("id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .unwrap_or_else(Uuid::new_v4)
    });
    user.insert("id".to_string(), Value::String(id.to_string()));

    if let Some(Value::String(plaintext)) = user.remove("password") {
        if !user.contains_key("passwordHash") {
            let hash = PasswordHash::derive(&plaintext);
            user.insert(
                "passwordHash".to_string(),
                Value::String(hash.as_str().to_string()),
            );
        }
    }
}

fn registry_id_for_email(object: &Object, email: &str) -> Option<String> {
    if email.trim().is_empty() {
        return None;
    }
    let Some(Value::Array(users)) = object.get("users") else {
        return None;
    };
    users
        .iter()
        .filter_map(Value::as_object)
        .find(|user| {
            user.get("email")
                .and_then(Value::as_str)
                .is_some_and(|candidate| emails_match(candidate, email))
        })
        .and_then(|user| user.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
