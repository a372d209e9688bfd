//! HTTP surface for the recipe service

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::generation::{ClaudeClient, DallEClient, RecipePipeline};
use crate::images::MediaStore;

mod account;
mod middleware;
mod recipes;

#[derive(Clone)]
pub(crate) struct AppState {
    db: DatabaseConnection,
    pipeline: Arc<RecipePipeline>,
    media: MediaStore,
}

impl AppState {
    fn new(db: DatabaseConnection, pipeline: Arc<RecipePipeline>, media: MediaStore) -> Self {
        Self {
            db,
            pipeline,
            media,
        }
    }
}

fn create_router(uploads_dir: &std::path::Path) -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes/generate",
            axum::routing::post(recipes::generate_recipe),
        )
        .route("/api/recipes", axum::routing::get(recipes::list_recipes))
        .route(
            "/api/recipes/{id}",
            axum::routing::get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite",
            axum::routing::post(recipes::toggle_favorite),
        )
        .route(
            "/api/account",
            axum::routing::delete(account::delete_account),
        )
        .route(
            "/api/meta/cuisines",
            axum::routing::get(recipes::list_cuisines),
        )
        .route(
            "/api/meta/meat-types",
            axum::routing::get(recipes::list_meat_types),
        )
        .route(
            "/api/meta/side-ingredients",
            axum::routing::get(recipes::list_side_ingredients),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
}

/// Builds the provider clients and pipeline from config and serves the
/// API until the listener fails.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    config: &AppConfig,
    db: DatabaseConnection,
) -> Result<(), anyhow::Error> {
    let media = MediaStore::new(config.uploads_dir.clone());
    let pipeline = RecipePipeline::new(
        Arc::new(ClaudeClient::new(
            config.claude_api_key.clone(),
            config.claude_model.clone(),
        )),
        Arc::new(DallEClient::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )),
        media.clone(),
        reqwest::Client::new(),
        config.recipe_generation_limit.clone(),
    );

    let app = create_router(&config.uploads_dir).with_state(AppState::new(
        db,
        Arc::new(pipeline),
        media,
    ));

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
