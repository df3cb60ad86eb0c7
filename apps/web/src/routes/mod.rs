pub mod health;
pub mod pages;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // The whole product is one page
        .route("/", get(pages::show_form).post(pages::create_recipe))
        .with_state(state)
}
