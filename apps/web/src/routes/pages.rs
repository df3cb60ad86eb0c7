//! Handlers for the recipe page.
//!
//! One surface: GET / shows the ingredient form, POST / generates a recipe
//! from the submitted ingredients and renders it with related-recipe cards.

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecipeForm {
    pub ingredients: String,
}

/// GET /
///
/// Renders the empty ingredient form.
pub async fn show_form() -> Result<Html<String>, AppError> {
    render::page(None, None, &[]).map(Html)
}

/// POST /
///
/// Generates a recipe for the submitted ingredients, then decorates the page
/// with related recipes. Only the generation step can fail the request; the
/// related lookup degrades to its fallback record on its own.
pub async fn create_recipe(
    State(state): State<AppState>,
    Form(form): Form<RecipeForm>,
) -> Result<Html<String>, AppError> {
    // Validate request
    if form.ingredients.trim().is_empty() {
        return Err(AppError::Validation(
            "ingredients cannot be empty".to_string(),
        ));
    }

    let recipe = generation::generate(state.model.as_ref(), &form.ingredients).await?;
    info!("generated recipe: {}", recipe.title);

    let related = state.related.lookup(&recipe.title).await;

    render::page(Some(&recipe.html), Some(&recipe.title), &related).map(Html)
}
