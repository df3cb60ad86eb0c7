//! Recipe-site scraping source for related recipes.
//!
//! A fixed table of public recipe sites, each with the CSS selectors its
//! search results currently use. A site redesign shows up as
//! `LookupError::NoMatches`; the caller logs it and moves on.

use reqwest::Url;
use scraper::{Html, Selector};
use url::form_urlencoded;

use super::{source_label, LookupError, RelatedRecipe, MIN_TITLE_CHARS, PLACEHOLDER_IMAGE};

/// Records harvested per site.
const PER_SITE: usize = 2;

/// One recipe site: search URL prefix plus result-card selectors.
/// The encoded query is appended directly to `base_url`, which is why the
/// allrecipes entry ends in `?q=` while food.com uses a path segment.
#[derive(Debug, Clone)]
pub struct Site {
    pub base_url: String,
    pub title_selector: String,
    pub image_selector: String,
}

impl Site {
    pub fn new(base_url: &str, title_selector: &str, image_selector: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            title_selector: title_selector.to_string(),
            image_selector: image_selector.to_string(),
        }
    }
}

/// The sites consulted for related recipes, in order.
pub fn default_sites() -> Vec<Site> {
    vec![
        Site::new(
            "https://www.allrecipes.com/search?q=",
            ".card__title-text",
            ".card__image img",
        ),
        Site::new("https://www.food.com/search/", ".title a", ".recipe-image img"),
        Site::new(
            "https://www.simplyrecipes.com/search?q=",
            ".card__title",
            ".card__image img",
        ),
    ]
}

/// Searches one site for recipes related to `recipe_title`.
///
/// Returns at most `PER_SITE` records. Selector misses are reported as
/// `LookupError::NoMatches` so the caller can tell "site down" from
/// "markup changed".
pub async fn search_site(
    http: &reqwest::Client,
    site: &Site,
    recipe_title: &str,
) -> Result<Vec<RelatedRecipe>, LookupError> {
    let url = search_url(&site.base_url, recipe_title);

    let response = http.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    let records = extract_cards(&body, site);

    if records.is_empty() {
        return Err(LookupError::NoMatches);
    }
    Ok(records)
}

/// Builds the site search URL by appending the form-encoded query.
fn search_url(base_url: &str, recipe_title: &str) -> String {
    let query: String =
        form_urlencoded::byte_serialize(format!("{recipe_title} recipe").as_bytes()).collect();
    format!("{base_url}{query}")
}

/// Pulls recipe cards out of a search results page.
///
/// The sites put the lead card's photo first, so one page-level image lookup
/// serves every record from that site; cards whose title element is an anchor
/// also contribute a link.
fn extract_cards(body: &str, site: &Site) -> Vec<RelatedRecipe> {
    let document = Html::parse_document(body);
    let title_selector = Selector::parse(&site.title_selector).expect("Invalid title selector");
    let image_selector = Selector::parse(&site.image_selector).expect("Invalid image selector");

    let image_url = document
        .select(&image_selector)
        .next()
        .and_then(|img| {
            img.value()
                .attr("data-src")
                .or_else(|| img.value().attr("src"))
        })
        .map(|src| src.to_string())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let source = source_label(&site.base_url);

    document
        .select(&title_selector)
        .take(PER_SITE)
        .filter_map(|element| {
            let title = element.text().collect::<String>().trim().to_string();
            if title.chars().count() <= MIN_TITLE_CHARS {
                return None;
            }

            Some(RelatedRecipe {
                title,
                image_url: image_url.clone(),
                url: element.value().attr("href").map(|href| href.to_string()),
                source: source.clone(),
            })
        })
        .collect()
}

/// Tries to pull a lead image from a recipe page. Best effort: any failure is
/// `None`. Relative image paths resolve against the page URL.
pub async fn fetch_recipe_image(http: &reqwest::Client, page_url: &str) -> Option<String> {
    let response = http.get(page_url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let body = response.text().await.ok()?;

    let src = {
        let document = Html::parse_document(&body);
        let selector = Selector::parse("img.recipe-image").expect("Invalid image selector");
        let img = document.select(&selector).next()?;
        img.value()
            .attr("data-src")
            .or_else(|| img.value().attr("src"))?
            .to_string()
    };

    resolve_image_url(page_url, &src)
}

/// urljoin semantics: absolute srcs pass through, relative ones join onto the
/// page URL.
fn resolve_image_url(page_url: &str, src: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    base.join(src).ok().map(|joined| joined.to_string())
}
