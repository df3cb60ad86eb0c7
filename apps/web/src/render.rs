//! Page rendering: one embedded minijinja template for the whole surface.
//!
//! The template autoescapes everything by name convention; the converted
//! recipe body is the single value the template marks `safe`, because it is
//! produced by our own markup pass and nothing else.

use std::sync::LazyLock;

use anyhow::Context;
use minijinja::{context, Environment};

use crate::errors::AppError;
use crate::related::RelatedRecipe;

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../templates/index.html"))
        .expect("index template must parse");
    env
});

/// Renders the single page. `recipe` is already-converted HTML; `None` renders
/// the bare ingredient form.
pub fn page(
    recipe: Option<&str>,
    generated_title: Option<&str>,
    related_recipes: &[RelatedRecipe],
) -> Result<String, AppError> {
    let template = TEMPLATES
        .get_template("index.html")
        .context("index template missing")?;

    let html = template
        .render(context! {
            recipe => recipe,
            generated_title => generated_title,
            related_recipes => related_recipes,
        })
        .context("failed to render index template")?;

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, url: Option<&str>) -> RelatedRecipe {
        RelatedRecipe {
            title: title.to_string(),
            image_url: "/api/placeholder/300/200".to_string(),
            url: url.map(|u| u.to_string()),
            source: "Allrecipes".to_string(),
        }
    }

    #[test]
    fn test_empty_form_page() {
        let html = page(None, None, &[]).unwrap();

        assert!(html.contains("<form method=\"post\""));
        assert!(html.contains("name=\"ingredients\""));
        assert!(!html.contains("Related recipes"));
    }

    #[test]
    fn test_recipe_html_is_injected_unescaped() {
        let html = page(
            Some("<h1>Beef Stew</h1>\n<strong>Ingredients:</strong>"),
            Some("Beef Stew"),
            &[card("Hearty Beef Stew", Some("https://www.allrecipes.com/r/1"))],
        )
        .unwrap();

        assert!(html.contains("<h1>Beef Stew</h1>"));
        assert!(!html.contains("&lt;h1&gt;"));
        assert!(html.contains("Hearty Beef Stew"));
        // Autoescape rewrites the slashes inside attribute values
        assert!(html.contains("href=\"https:&#x2f;&#x2f;www.allrecipes.com&#x2f;r&#x2f;1\""));
    }

    #[test]
    fn test_card_titles_are_escaped() {
        let html = page(
            Some("<h1>Stew</h1>"),
            Some("Stew"),
            &[card("Stew <script>alert(1)</script>", None)],
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_linkless_card_renders_plain_title() {
        let html = page(Some("<h1>Stew</h1>"), Some("Stew"), &[card("Similar Stew", None)]).unwrap();

        assert!(html.contains("Similar Stew"));
        assert!(!html.contains("<a href=\"\""));
    }
}
