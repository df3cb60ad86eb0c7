//! Markup conversion: turns the model's three-symbol recipe dialect into HTML.
//!
//! The dialect is the one `llm_client::prompts` asks for: `##Title##`,
//! `**Section:**` bold markers, and `~item~` lines. Older model output wrote
//! items with single `*item*` pairs and left the title unterminated, so both
//! forms are accepted. There is no escaping or malformed-input recovery;
//! unmatched delimiters pass through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Title used when the model omits the `##` delimiters entirely.
pub const DEFAULT_TITLE: &str = "Recipe";

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"##(.*?)##").unwrap());
/// Unterminated title form: `## Title` up to the next `*` or end of line.
static OPEN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"##\s*([^*\n]+)").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static TILDE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~(.*?)~").unwrap());
static STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// A generated recipe after markup conversion.
#[derive(Debug, Clone)]
pub struct FormattedRecipe {
    /// Display HTML for the recipe body.
    pub html: String,
    /// Plain-text title, also the seed for the related-recipe lookup.
    pub title: String,
}

/// Converts recipe markup to HTML and pulls out the title.
///
/// Pass order matters: titles run before emphasis so `##` never reads as two
/// stray characters, and `**` pairs are consumed before the single-`*` pass
/// can see them.
pub fn format_recipe(text: &str) -> FormattedRecipe {
    let title = extract_title(text);

    let html = if TITLE_RE.is_match(text) {
        TITLE_RE.replace_all(text, "<h1>$1</h1>\n")
    } else {
        OPEN_TITLE_RE.replace_all(text, "<h1>$1</h1>\n")
    };
    let html = BOLD_RE.replace_all(&html, "\n<strong>$1</strong>\n");
    let html = TILDE_RE.replace_all(&html, "$1<br>");
    let html = STAR_RE.replace_all(&html, "$1<br>");

    FormattedRecipe {
        html: html.into_owned(),
        title,
    }
}

/// Extracts the recipe title: paired `##Title##` first, then the unterminated
/// form, then the fixed default.
fn extract_title(text: &str) -> String {
    for re in [&TITLE_RE, &OPEN_TITLE_RE] {
        if let Some(caps) = re.captures(text) {
            let title = caps[1].trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }
    DEFAULT_TITLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL_OUTPUT: &str = "##Garlic Butter Pasta##\n\
        **Ingredients:**\n\
        ~1. 8 oz spaghetti~\n\
        ~2. 3 cloves garlic, minced~\n\
        **Instructions:**\n\
        ~1. Boil the spaghetti until al dente.~\n\
        ~2. Toss with the garlic butter.~\n\
        **Tips:**\n\
        ~Reserve a cup of pasta water.~";

    #[test]
    fn test_paired_title_becomes_h1() {
        let out = format_recipe("##Pasta##");
        assert_eq!(out.html, "<h1>Pasta</h1>\n");
        assert_eq!(out.title, "Pasta");
    }

    #[test]
    fn test_bold_sections_become_strong() {
        let out = format_recipe("**Ingredients:**");
        assert!(out.html.contains("<strong>Ingredients:</strong>"));
    }

    #[test]
    fn test_tilde_items_get_line_breaks() {
        let out = format_recipe("~1 cup flour~");
        assert!(out.html.contains("1 cup flour<br>"));
    }

    #[test]
    fn test_missing_title_falls_back() {
        let out = format_recipe("**Ingredients:**\n~salt~");
        assert_eq!(out.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_full_model_output() {
        let out = format_recipe(MODEL_OUTPUT);

        assert_eq!(out.title, "Garlic Butter Pasta");
        assert!(out.html.contains("<h1>Garlic Butter Pasta</h1>"));
        assert!(out.html.contains("<strong>Ingredients:</strong>"));
        assert!(out.html.contains("<strong>Instructions:</strong>"));
        assert!(out.html.contains("<strong>Tips:</strong>"));
        assert!(out.html.contains("2. 3 cloves garlic, minced<br>"));
        assert!(!out.html.contains("##"));
        assert!(!out.html.contains("**"));
        assert!(!out.html.contains('~'));
    }

    #[test]
    fn test_unterminated_title_is_still_extracted() {
        let out = format_recipe("## Pasta Primavera\n**Ingredients:**\n~rice~");
        assert_eq!(out.title, "Pasta Primavera");
        assert!(out.html.contains("<h1>Pasta Primavera</h1>"));
    }

    #[test]
    fn test_single_star_items_after_bold_pass() {
        let out = format_recipe("**Ingredients:**\n*1 cup rice*\n*2 cups water*");
        assert!(out.html.contains("<strong>Ingredients:</strong>"));
        assert!(out.html.contains("1 cup rice<br>"));
        assert!(out.html.contains("2 cups water<br>"));
    }

    #[test]
    fn test_unmatched_delimiters_pass_through() {
        let out = format_recipe("~no closing marker");
        assert_eq!(out.html, "~no closing marker");
        assert_eq!(out.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_empty_input() {
        let out = format_recipe("");
        assert_eq!(out.html, "");
        assert_eq!(out.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_title_with_surrounding_whitespace_is_trimmed() {
        let out = format_recipe("## Beef Stew ##");
        assert_eq!(out.title, "Beef Stew");
    }
}
