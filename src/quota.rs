//! Recipe generation quota resolution
//!
//! The stored per-user value is a sentinel-encoded optional: `NULL` defers
//! to the global config, `-1` is unlimited, `0` blocks, `n > 0` caps. The
//! sentinels are turned into [EffectiveLimit] exactly once, here, so no
//! downstream code re-interprets magic numbers.

use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::warn;

use crate::audit;
use crate::db::entities::{recipes, users};

/// The quota actually enforced for a user after resolving their override
/// against the global default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectiveLimit {
    /// No cap; generation always allowed.
    Unlimited,
    /// Generation blocked outright, no counting needed.
    Blocked,
    /// At most this many lifetime generations.
    Capped(u64),
}

impl EffectiveLimit {
    /// Resolves a per-user override value.
    pub fn from_user_override(limit: i32) -> Self {
        match limit {
            -1 => EffectiveLimit::Unlimited,
            n if n <= 0 => EffectiveLimit::Blocked,
            n => EffectiveLimit::Capped(n as u64),
        }
    }

    /// Resolves the global configuration value. The literal `unlimited`
    /// (or an empty value) means no cap. An unparsable value is a config
    /// typo, not a reason to lock everyone out: policy is to fail open.
    pub fn from_global(raw: &str) -> Self {
        if raw.is_empty() || raw == "unlimited" {
            return EffectiveLimit::Unlimited;
        }
        match raw.parse::<u64>() {
            Ok(0) => EffectiveLimit::Blocked,
            Ok(n) => EffectiveLimit::Capped(n),
            Err(_) => {
                warn!("Unparsable global recipe limit {raw:?}, failing open");
                EffectiveLimit::Unlimited
            }
        }
    }
}

/// Decides whether the user may generate another recipe.
///
/// Read-only apart from the recipe count query. Lookup failures fail open
/// so an infrastructure hiccup never locks users out; each fail-open path
/// is logged. The count-then-insert sequence is not atomic, so concurrent
/// requests can push a user one past their cap: accepted as a soft limit.
pub async fn can_generate(db: &DatabaseConnection, user_id: &str, global_limit: &str) -> bool {
    let user_override = match users::recipe_limit_for(db, user_id).await {
        Ok(value) => value,
        Err(err) => {
            audit::record_failure(
                "recipe.limit_check_failed",
                user_id,
                "Failed to read recipe limit, failing open",
                &err.to_string(),
                json!({}),
            );
            return true;
        }
    };

    let effective = match user_override {
        Some(limit) => EffectiveLimit::from_user_override(limit),
        None => EffectiveLimit::from_global(global_limit),
    };

    match effective {
        EffectiveLimit::Unlimited => true,
        EffectiveLimit::Blocked => {
            audit::record_warn(
                "recipe.limit_blocked",
                user_id,
                "Recipe generation blocked by limit",
                json!({ "has_personal_limit": user_override.is_some() }),
            );
            false
        }
        EffectiveLimit::Capped(limit) => {
            let count = match recipes::count_for_user(db, user_id).await {
                Ok(count) => count,
                Err(err) => {
                    warn!("Recipe count query failed for {user_id}, failing open: {err}");
                    return true;
                }
            };
            if count >= limit {
                audit::record_warn(
                    "recipe.limit_reached",
                    user_id,
                    "Recipe generation limit reached",
                    json!({
                        "current_count": count,
                        "effective_limit": limit,
                        "has_personal_limit": user_override.is_some(),
                    }),
                );
                return false;
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};
    use sea_orm_migration::MigratorTrait;

    use crate::db::entities::{recipes, users};

    #[test]
    fn user_override_sentinels() {
        assert_eq!(
            EffectiveLimit::from_user_override(-1),
            EffectiveLimit::Unlimited
        );
        assert_eq!(
            EffectiveLimit::from_user_override(0),
            EffectiveLimit::Blocked
        );
        assert_eq!(
            EffectiveLimit::from_user_override(5),
            EffectiveLimit::Capped(5)
        );
        // Any other negative value can never be satisfied by a count.
        assert_eq!(
            EffectiveLimit::from_user_override(-7),
            EffectiveLimit::Blocked
        );
    }

    #[test]
    fn global_limit_parsing() {
        assert_eq!(EffectiveLimit::from_global("unlimited"), EffectiveLimit::Unlimited);
        assert_eq!(EffectiveLimit::from_global(""), EffectiveLimit::Unlimited);
        assert_eq!(EffectiveLimit::from_global("0"), EffectiveLimit::Blocked);
        assert_eq!(EffectiveLimit::from_global("10"), EffectiveLimit::Capped(10));
        // A config typo fails open rather than blocking everyone.
        assert_eq!(
            EffectiveLimit::from_global("ten-ish"),
            EffectiveLimit::Unlimited
        );
    }

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = crate::db::connect_test_db().await.expect("connect test db");
        crate::db::migrations::Migrator::up(&db, None)
            .await
            .expect("run migrations");
        db
    }

    async fn insert_user(db: &sea_orm::DatabaseConnection, id: &str, limit: Option<i32>) {
        users::ActiveModel {
            id: Set(id.to_string()),
            email: Set(format!("{id}@example.org")),
            recipe_limit: Set(limit),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
        .expect("insert user");
    }

    async fn insert_recipe(db: &sea_orm::DatabaseConnection, user_id: &str, n: usize) {
        recipes::ActiveModel {
            id: Set(format!("{user_id}-recipe-{n}")),
            user_id: Set(user_id.to_string()),
            title: Set("Test".to_string()),
            description: Set("Test".to_string()),
            ingredients: Set("[]".to_string()),
            steps: Set("[]".to_string()),
            serving_size: Set(2),
            cooking_time: Set(30),
            difficulty: Set("easy".to_string()),
            cuisine_type: Set("Italian".to_string()),
            meat_type: Set("Chicken".to_string()),
            dietary_tags: Set("[]".to_string()),
            is_favorite: Set(false),
            image_path: Set(None),
            thumbnail_path: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
        .expect("insert recipe");
    }

    #[tokio::test]
    async fn personal_unlimited_ignores_count() {
        let db = setup_db().await;
        insert_user(&db, "alice", Some(-1)).await;
        for n in 0..3 {
            insert_recipe(&db, "alice", n).await;
        }
        assert!(can_generate(&db, "alice", "0").await);
    }

    #[tokio::test]
    async fn personal_zero_blocks_before_counting() {
        let db = setup_db().await;
        insert_user(&db, "bob", Some(0)).await;
        assert!(!can_generate(&db, "bob", "unlimited").await);
    }

    #[tokio::test]
    async fn personal_cap_enforced_at_count() {
        let db = setup_db().await;
        insert_user(&db, "carol", Some(2)).await;
        assert!(can_generate(&db, "carol", "unlimited").await);
        insert_recipe(&db, "carol", 0).await;
        assert!(can_generate(&db, "carol", "unlimited").await);
        insert_recipe(&db, "carol", 1).await;
        assert!(!can_generate(&db, "carol", "unlimited").await);
    }

    #[tokio::test]
    async fn missing_override_defers_to_global() {
        let db = setup_db().await;
        insert_user(&db, "dave", None).await;
        insert_recipe(&db, "dave", 0).await;
        assert!(!can_generate(&db, "dave", "1").await);
        assert!(can_generate(&db, "dave", "2").await);
        assert!(can_generate(&db, "dave", "unlimited").await);
    }

    #[tokio::test]
    async fn garbage_global_limit_fails_open() {
        let db = setup_db().await;
        insert_user(&db, "erin", None).await;
        assert!(can_generate(&db, "erin", "not-a-number").await);
    }
}
