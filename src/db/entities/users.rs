//! DB storage for user accounts
//!
//! Account management owns this table; the generation pipeline only reads
//! the per-user `recipe_limit` override.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
/// A registered user
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    /// uuid, issued by account management
    pub id: String,
    /// login email
    pub email: String,
    /// Per-user generation override. `NULL` defers to the global limit,
    /// `-1` is unlimited, `0` blocks generation, `n > 0` caps lifetime
    /// generations at `n`.
    pub recipe_limit: Option<i32>,
    /// account creation time
    pub created_at: DateTime,
}

/// relations for users
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipes::Entity")]
    /// the user's recipes
    Recipes,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Reads the raw per-user limit override. A missing user row reads as no
/// override, deferring to the global limit.
pub async fn recipe_limit_for(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<i32>, DbErr> {
    Ok(Entity::find_by_id(user_id)
        .one(db)
        .await?
        .and_then(|user| user.recipe_limit))
}
