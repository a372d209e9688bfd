//! The recipe generation pipeline
//!
//! One request flows gate -> prompt -> text call -> parse -> image call
//! -> normalize -> persist. The text half is fatal on failure; the image
//! half degrades to a recipe without media.

pub mod claude;
pub mod openai;
pub mod parser;
pub mod prompt;

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::audit;
use crate::db::entities::recipes;
use crate::error::SaucierError;
use crate::images::MediaStore;
use crate::quota;

pub use claude::{ClaudeClient, TextGenerator};
pub use openai::{DallEClient, ImageGenerator, ImagePayload};

/// Languages a recipe can be generated in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (default)
    #[default]
    En,
    /// Slovak
    Sk,
}

/// Requested total cooking time band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingTimeBand {
    /// under 30 minutes
    Quick,
    /// 30-60 minutes
    Medium,
    /// over 60 minutes
    Long,
}

impl CookingTimeBand {
    /// Human phrase used in the compiled prompt.
    pub fn as_phrase(self) -> &'static str {
        match self {
            CookingTimeBand::Quick => "under 30 minutes",
            CookingTimeBand::Medium => "30-60 minutes",
            CookingTimeBand::Long => "over 60 minutes",
        }
    }
}

/// Requested difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedDifficulty {
    /// beginner friendly
    Easy,
    /// some technique required
    Medium,
    /// experienced cooks
    Hard,
}

impl RequestedDifficulty {
    /// Label used in the compiled prompt.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestedDifficulty::Easy => "easy",
            RequestedDifficulty::Medium => "medium",
            RequestedDifficulty::Hard => "hard",
        }
    }
}

/// A structured recipe generation request. Immutable input; absent fields
/// mean the corresponding constraint line is simply not emitted.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GenerationRequest {
    /// Main protein, eg `Chicken`. `None (Vegetarian)` or absence asks
    /// for a vegetarian recipe.
    #[serde(default)]
    pub meat_type: Option<String>,
    /// Cuisine style, eg `Italian`.
    #[serde(default)]
    pub cuisine_type: Option<String>,
    /// Ingredients that must appear in the recipe.
    #[serde(default)]
    pub side_ingredients: Vec<String>,
    /// Dietary constraints, carried through to the stored recipe verbatim.
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    /// Total time band.
    #[serde(default)]
    pub cooking_time: Option<CookingTimeBand>,
    /// Difficulty level.
    #[serde(default)]
    pub difficulty: Option<RequestedDifficulty>,
    /// Reply language.
    #[serde(default)]
    pub language: Locale,
}

/// One ingredient line. Quantity is always a string, even when the model
/// emitted a number, so unit-bearing text stays uniform.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Ingredient {
    /// ingredient name
    pub name: String,
    /// amount, eg `500`
    pub quantity: String,
    /// unit, eg `g`
    pub unit: String,
}

/// One cooking step as surfaced by the model.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CookingStep {
    /// 1-based step number, surfaced as given
    pub step_number: i32,
    /// what to do
    pub instruction: String,
    /// eg `5 minutes`
    #[serde(default)]
    pub timing: String,
    /// eg `180°C`
    #[serde(default)]
    pub temperature: String,
}

/// A parsed recipe, transient until persisted. Produced by the reply
/// parser and either promoted into a recipe row or discarded whole.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeDraft {
    /// recipe title
    pub title: String,
    /// short description
    pub description: String,
    /// number of people served
    pub serving_size: i32,
    /// preparation minutes as reported
    pub prep_time_minutes: i32,
    /// cooking minutes as reported
    pub cook_time_minutes: i32,
    /// difficulty as reported
    pub difficulty: String,
    /// ingredient list, at least one entry
    pub ingredients: Vec<Ingredient>,
    /// cooking steps, at least one entry
    pub steps: Vec<CookingStep>,
    /// professional tips
    pub tips: Vec<String>,
    /// cuisine style
    pub cuisine_type: String,
    /// main protein
    pub meat_type: String,
    /// dietary tags copied from the request, not the reply
    pub dietary_tags: Vec<String>,
}

impl RecipeDraft {
    /// Total minutes persisted with the recipe.
    pub fn total_minutes(&self) -> i32 {
        self.prep_time_minutes.saturating_add(self.cook_time_minutes)
    }
}

/// The full recipe returned to the caller after persistence.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedRecipe {
    /// recipe id
    pub id: String,
    /// owning user
    pub user_id: String,
    /// recipe title
    pub title: String,
    /// short description
    pub description: String,
    /// ingredient list
    pub ingredients: Vec<Ingredient>,
    /// cooking steps
    pub steps: Vec<CookingStep>,
    /// professional tips
    pub tips: Vec<String>,
    /// number of people served
    pub serving_size: i32,
    /// total prep + cook minutes
    pub cooking_time: i32,
    /// difficulty
    pub difficulty: String,
    /// cuisine style
    pub cuisine_type: String,
    /// main protein
    pub meat_type: String,
    /// dietary tags
    pub dietary_tags: Vec<String>,
    /// favorite flag
    pub is_favorite: bool,
    /// serving path of the full-size image, if any
    pub image_path: Option<String>,
    /// serving path of the thumbnail, if any
    pub thumbnail_path: Option<String>,
}

/// The generation orchestrator. Holds the two provider seams and the
/// media store; [RecipePipeline::run] is the only place a recipe row is
/// written.
pub struct RecipePipeline {
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    media: MediaStore,
    http: reqwest::Client,
    global_recipe_limit: String,
}

impl RecipePipeline {
    /// Builds a pipeline around the given providers.
    pub fn new(
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        media: MediaStore,
        http: reqwest::Client,
        global_recipe_limit: String,
    ) -> Self {
        Self {
            text,
            image,
            media,
            http,
            global_recipe_limit,
        }
    }

    /// Runs one generation request end to end.
    ///
    /// The quota gate runs before any provider call. A text or parse
    /// failure aborts with no row written; an image failure anywhere
    /// (synthesis, download, normalization) is logged and the recipe is
    /// persisted without media. Exactly one audit event is emitted per
    /// terminal state.
    pub async fn run(
        &self,
        db: &DatabaseConnection,
        user_id: &str,
        request: GenerationRequest,
    ) -> Result<GeneratedRecipe, SaucierError> {
        if !quota::can_generate(db, user_id, &self.global_recipe_limit).await {
            // quota already audited the denial
            return Err(SaucierError::QuotaExceeded);
        }

        audit::record(
            "recipe.generate_start",
            user_id,
            "Recipe generation initiated",
            json!({
                "meat_type": request.meat_type,
                "cuisine_type": request.cuisine_type,
                "difficulty": request.difficulty,
            }),
        );

        let compiled = prompt::compile(&request);
        let draft = match self.text.complete(&compiled).await {
            Ok(raw) => parser::parse(&raw, &request),
            Err(err) => Err(err),
        };
        let draft = match draft {
            Ok(draft) => draft,
            Err(err) => {
                audit::record_failure(
                    "recipe.generate_failure",
                    user_id,
                    "Recipe generation failed",
                    &format!("{err:?}"),
                    json!({
                        "meat_type": request.meat_type,
                        "cuisine_type": request.cuisine_type,
                    }),
                );
                return Err(err);
            }
        };

        let media = self.generate_media(&draft).await;

        let recipe_id = Uuid::new_v4().to_string();
        let total_minutes = draft.total_minutes();
        let ingredients_json = serde_json::to_string(&draft.ingredients)
            .map_err(|err| SaucierError::InternalServerError(err.to_string()))?;
        let steps_json = serde_json::to_string(&draft.steps)
            .map_err(|err| SaucierError::InternalServerError(err.to_string()))?;
        let dietary_tags_json =
            serde_json::to_string(&draft.dietary_tags).unwrap_or_else(|_| "[]".to_string());

        let (image_path, thumbnail_path) = match &media {
            Some(paths) => (
                Some(paths.image_path.clone()),
                Some(paths.thumbnail_path.clone()),
            ),
            None => (None, None),
        };

        recipes::ActiveModel {
            id: Set(recipe_id.clone()),
            user_id: Set(user_id.to_string()),
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            ingredients: Set(ingredients_json),
            steps: Set(steps_json),
            serving_size: Set(draft.serving_size),
            cooking_time: Set(total_minutes),
            difficulty: Set(draft.difficulty.clone()),
            cuisine_type: Set(draft.cuisine_type.clone()),
            meat_type: Set(draft.meat_type.clone()),
            dietary_tags: Set(dietary_tags_json),
            is_favorite: Set(false),
            image_path: Set(image_path.clone()),
            thumbnail_path: Set(thumbnail_path.clone()),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await?;

        audit::record(
            "recipe.generate_success",
            user_id,
            "Recipe generated successfully",
            json!({
                "recipe_id": recipe_id,
                "recipe_title": draft.title,
                "meat_type": draft.meat_type,
                "cuisine_type": draft.cuisine_type,
                "difficulty": draft.difficulty,
                "has_image": media.is_some(),
            }),
        );

        Ok(GeneratedRecipe {
            id: recipe_id,
            user_id: user_id.to_string(),
            title: draft.title,
            description: draft.description,
            ingredients: draft.ingredients,
            steps: draft.steps,
            tips: draft.tips,
            serving_size: draft.serving_size,
            cooking_time: total_minutes,
            difficulty: draft.difficulty,
            cuisine_type: draft.cuisine_type,
            meat_type: draft.meat_type,
            dietary_tags: draft.dietary_tags,
            is_favorite: false,
            image_path,
            thumbnail_path,
        })
    }

    /// Best-effort media production: any failure logs a warning and the
    /// recipe proceeds without an image.
    async fn generate_media(&self, draft: &RecipeDraft) -> Option<crate::images::MediaVariantPaths> {
        let image_prompt = openai::food_photography_prompt(
            &draft.title,
            &draft.cuisine_type,
            &draft.description,
        );

        let payload = match self.image.generate(&image_prompt).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Image synthesis failed, continuing without media: {err}");
                return None;
            }
        };

        let raw = match openai::fetch_image_bytes(&self.http, payload).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Image retrieval failed, continuing without media: {err}");
                return None;
            }
        };

        match self.media.store_variants(raw).await {
            Ok(paths) => Some(paths),
            Err(err) => {
                warn!("Image normalization failed, continuing without media: {err}");
                None
            }
        }
    }
}
