//! DB storage for generated recipes

use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
/// A persisted recipe. Ingredients, steps and dietary tags are stored as
/// JSON-encoded text columns; the two media paths are always both present
/// or both absent.
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    /// uuid
    pub id: String,
    /// owning user
    pub user_id: String,
    /// recipe title
    pub title: String,
    /// short description
    pub description: String,
    #[sea_orm(column_type = "Text")]
    /// JSON-encoded ingredient array
    pub ingredients: String,
    #[sea_orm(column_type = "Text")]
    /// JSON-encoded cooking step array
    pub steps: String,
    /// number of people served
    pub serving_size: i32,
    /// total prep + cook minutes
    pub cooking_time: i32,
    /// difficulty as reported by the model
    pub difficulty: String,
    /// cuisine style
    pub cuisine_type: String,
    /// main protein
    pub meat_type: String,
    #[sea_orm(column_type = "Text")]
    /// JSON-encoded dietary tag array, copied from the request
    pub dietary_tags: String,
    /// favorite flag
    pub is_favorite: bool,
    /// storage path of the full-size image, if media was produced
    pub image_path: Option<String>,
    /// storage path of the thumbnail, if media was produced
    pub thumbnail_path: Option<String>,
    /// creation time
    pub created_at: DateTime,
}

/// relations for recipes
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    /// owning user
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Counts the user's existing recipes, for quota enforcement.
pub async fn count_for_user(db: &DatabaseConnection, user_id: &str) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .count(db)
        .await
}

/// Returns the user's recipes, newest first.
pub async fn list_for_user(db: &DatabaseConnection, user_id: &str) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
}

/// Fetches a single recipe owned by the given user.
pub async fn find_owned(
    db: &DatabaseConnection,
    recipe_id: &str,
    user_id: &str,
) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(recipe_id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Returns the stored media paths for all of a user's recipes, consumed by
/// media cleanup when an account is removed.
pub async fn media_paths_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<String>, DbErr> {
    let rows: Vec<(Option<String>, Option<String>)> = Entity::find()
        .select_only()
        .column(Column::ImagePath)
        .column(Column::ThumbnailPath)
        .filter(Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .flat_map(|(image, thumb)| [image, thumb])
        .flatten()
        .collect())
}
