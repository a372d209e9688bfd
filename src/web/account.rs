//! Account removal

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::json;

use super::AppState;
use super::middleware::RequestUser;
use crate::audit;
use crate::db::entities::{recipes, users};
use crate::error::SaucierError;
use crate::images;

/// Deletes the caller's account. Recipe rows go with it via the cascading
/// foreign key; stored media is swept afterwards, collected up front since
/// the rows are gone by then.
pub(crate) async fn delete_account(
    State(state): State<AppState>,
    user: RequestUser,
) -> Result<impl IntoResponse, SaucierError> {
    let row = users::Entity::find_by_id(&user.user_id)
        .one(&state.db)
        .await?
        .ok_or(SaucierError::NotFound(user.user_id.clone()))?;

    let variants = recipes::media_paths_for_user(&state.db, &user.user_id).await?;

    row.delete(&state.db).await?;

    let report = images::delete_variants(&state.media, &variants);
    if !report.all_ok() {
        audit::record_warn(
            "recipe.image_cleanup",
            &user.user_id,
            "Account media cleanup left files behind",
            json!({
                "deleted_files": report.deleted,
                "failed_files": report.failed,
            }),
        );
    }

    audit::record(
        "user.delete",
        &user.user_id,
        "User account deleted",
        json!({ "recipe_media_removed": report.deleted.len() }),
    );

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
