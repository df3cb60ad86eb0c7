//! Programmable Search source for related recipes.
//!
//! Consulted before the site scrapers when GOOGLE_CSE_ID and
//! GOOGLE_CSE_API_KEY are both configured; any failure here falls through to
//! scraping.

use reqwest::Url;
use serde::Deserialize;

use crate::config::Config;

use super::{source_label, LookupError, RelatedRecipe, MIN_TITLE_CHARS, PLACEHOLDER_IMAGE};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
/// The API serves ten items a page; we only want the top of the list.
const MAX_SEARCH_RESULTS: usize = 5;

/// Credentials and endpoint for the Custom Search JSON API.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub engine_id: String,
    pub api_key: String,
    pub endpoint: String,
}

impl SearchConfig {
    /// Present only when both halves of the credential pair are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        match (&config.search_engine_id, &config.search_api_key) {
            (Some(engine_id), Some(api_key)) => Some(Self {
                engine_id: engine_id.clone(),
                api_key: api_key.clone(),
                endpoint: SEARCH_ENDPOINT.to_string(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: Option<String>,
    link: Option<String>,
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(default)]
    cse_thumbnail: Vec<SearchImage>,
    #[serde(default)]
    cse_image: Vec<SearchImage>,
}

#[derive(Debug, Deserialize)]
struct SearchImage {
    src: Option<String>,
}

impl SearchItem {
    /// Prefers the thumbnail the index built over the page's own image.
    fn image_url(&self) -> Option<String> {
        let pagemap = self.pagemap.as_ref()?;
        pagemap
            .cse_thumbnail
            .iter()
            .chain(pagemap.cse_image.iter())
            .find_map(|image| image.src.clone())
    }
}

/// Queries the search API for pages related to the generated title.
pub async fn search_related(
    http: &reqwest::Client,
    config: &SearchConfig,
    recipe_title: &str,
) -> Result<Vec<RelatedRecipe>, LookupError> {
    let query = format!("{recipe_title} recipe");
    let url = Url::parse_with_params(
        &config.endpoint,
        &[
            ("key", config.api_key.as_str()),
            ("cx", config.engine_id.as_str()),
            ("q", query.as_str()),
        ],
    )
    .expect("Invalid search endpoint");

    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }

    let parsed: SearchResponse = response.json().await?;

    let records: Vec<RelatedRecipe> = parsed
        .items
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .filter_map(|item| {
            let title = item.title.as_deref().unwrap_or_default().trim().to_string();
            if title.chars().count() <= MIN_TITLE_CHARS {
                return None;
            }

            let image_url = item
                .image_url()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
            let source = item
                .link
                .as_deref()
                .map(source_label)
                .unwrap_or_else(|| "Web".to_string());

            Some(RelatedRecipe {
                title,
                image_url,
                url: item.link,
                source,
            })
        })
        .collect();

    if records.is_empty() {
        return Err(LookupError::NoMatches);
    }
    Ok(records)
}
