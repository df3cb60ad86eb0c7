//! Recipe generation: fill the prompt, make one model call, convert markup.
//!
//! Flow: ingredients → RECIPE_PROMPT_TEMPLATE → GenerativeModel::generate →
//!       markup::format_recipe → FormattedRecipe.

pub mod markup;

use crate::errors::AppError;
use crate::llm_client::prompts::RECIPE_PROMPT_TEMPLATE;
use crate::llm_client::GenerativeModel;
use self::markup::{format_recipe, FormattedRecipe};

/// Generates a recipe for the submitted ingredient list and converts the
/// model's markup to display HTML. The title falls back to a fixed default
/// when the model omits its `##` delimiters.
pub async fn generate(
    model: &dyn GenerativeModel,
    ingredients: &str,
) -> Result<FormattedRecipe, AppError> {
    let prompt = RECIPE_PROMPT_TEMPLATE.replace("{ingredients}", ingredients);

    let raw = model
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("recipe generation failed: {e}")))?;

    Ok(format_recipe(&raw))
}
