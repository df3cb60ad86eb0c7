//! Related-recipe lookup: best-effort page enrichment, never a page failure.
//!
//! Sources run in order (Custom Search when configured, then the site table)
//! until five records are collected. Every source failure is logged and
//! skipped; an empty harvest yields one synthesized fallback record so the
//! page always has something to show.

pub mod search;
pub mod sites;

use std::time::Duration;

use rand::Rng;
use reqwest::Url;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;

/// Placeholder image used when a record has no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/300/200";

/// Source label on the synthesized fallback record.
const FALLBACK_SOURCE: &str = "Suggested Recipe";

/// Cap on the number of related records rendered per request.
const MAX_RELATED: usize = 5;

/// Titles this short are navigation noise, not recipes.
pub(crate) const MIN_TITLE_CHARS: usize = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Browser-like agent; the recipe sites answer plain library agents with 403s.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// A related-recipe card: display enrichment only, nothing downstream
/// depends on it.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedRecipe {
    pub title: String,
    pub image_url: String,
    pub url: Option<String>,
    pub source: String,
}

/// Failure reasons for one outbound lookup. Callers decide the fallback;
/// none of these ever reach the user.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("no matching elements")]
    NoMatches,
}

/// Client for the related-recipe sources. Holds one short-timeout HTTP client;
/// Custom Search credentials ride along when configured.
#[derive(Clone)]
pub struct RelatedClient {
    http: reqwest::Client,
    search: Option<search::SearchConfig>,
    sites: Vec<sites::Site>,
}

impl RelatedClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: build_http_client(),
            search: search::SearchConfig::from_config(config),
            sites: sites::default_sites(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_sources(
        search: Option<search::SearchConfig>,
        sites: Vec<sites::Site>,
    ) -> Self {
        Self {
            http: build_http_client(),
            search,
            sites,
        }
    }

    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    /// Looks up related recipes for a generated title.
    ///
    /// Infallible by contract: whatever the sources do, the caller gets at
    /// least one record and at most five.
    pub async fn lookup(&self, recipe_title: &str) -> Vec<RelatedRecipe> {
        let mut related = Vec::new();

        if let Some(search) = &self.search {
            match search::search_related(&self.http, search, recipe_title).await {
                Ok(mut records) => related.append(&mut records),
                Err(e) => warn!("custom search failed: {e}"),
            }
        }

        for site in &self.sites {
            if related.len() >= MAX_RELATED {
                break;
            }

            match sites::search_site(&self.http, site, recipe_title).await {
                Ok(mut records) => related.append(&mut records),
                Err(e) => warn!("related lookup on {} failed: {e}", site.base_url),
            }

            // Etiquette pause between successive site requests
            polite_pause().await;
        }

        related.truncate(MAX_RELATED);

        // Fill in page images for records that arrived with only a link
        for record in related.iter_mut() {
            if record.image_url != PLACEHOLDER_IMAGE {
                continue;
            }
            if let Some(url) = record.url.clone() {
                if let Some(image) = sites::fetch_recipe_image(&self.http, &url).await {
                    record.image_url = image;
                }
                polite_pause().await;
            }
        }

        if related.is_empty() {
            related.push(fallback_record(recipe_title));
        }

        related
    }
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
}

/// Synthesized entry shown when no real record could be obtained.
fn fallback_record(recipe_title: &str) -> RelatedRecipe {
    RelatedRecipe {
        title: format!("Similar {recipe_title}"),
        image_url: PLACEHOLDER_IMAGE.to_string(),
        url: None,
        source: FALLBACK_SOURCE.to_string(),
    }
}

/// Jittered 0.5 to 1.5 second pause so the site requests read like browsing.
async fn polite_pause() {
    let millis = rand::thread_rng().gen_range(500..=1500);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

/// Display label for a source URL, in the style the cards expect:
/// "https://www.food.com/..." becomes "Food".
pub(crate) fn source_label(url: &str) -> String {
    let name = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed.host_str().map(|host| {
                let host = host.strip_prefix("www.").unwrap_or(host);
                host.split('.').next().unwrap_or_default().to_string()
            })
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Web".to_string());

    let mut chars = name.chars();
    match chars.next() {
        None => name,
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::sites::Site;
    use httpmock::prelude::*;

    const CARDS_PAGE: &str = r#"
        <html><body>
          <div class="card__image"><img src="https://img.example.com/lead.jpg"></div>
          <a class="card__title-text" href="https://www.allrecipes.com/recipe/1">Hearty Beef Stew</a>
          <a class="card__title-text" href="https://www.allrecipes.com/recipe/2">Slow Cooker Stew</a>
        </body></html>
    "#;

    fn mock_site(base_url: String) -> Site {
        Site::new(&base_url, ".card__title-text", ".card__image img")
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label("https://www.allrecipes.com/search?q="), "Allrecipes");
        assert_eq!(source_label("https://www.food.com/search/"), "Food");
        assert_eq!(source_label("https://www.simplyrecipes.com/search?q="), "Simplyrecipes");
        assert_eq!(source_label("not a url"), "Web");
    }

    #[test]
    fn test_fallback_record_shape() {
        let record = fallback_record("Beef Stew");
        assert_eq!(record.title, "Similar Beef Stew");
        assert_eq!(record.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(record.url, None);
        assert_eq!(record.source, FALLBACK_SOURCE);
    }

    #[tokio::test]
    async fn test_lookup_without_sources_returns_fallback() {
        let client = RelatedClient::with_sources(None, Vec::new());
        let related = client.lookup("Beef Stew").await;

        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Similar Beef Stew");
        assert_eq!(related[0].source, "Suggested Recipe");
    }

    #[tokio::test]
    async fn test_lookup_collects_from_sites_in_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/one/search");
            then.status(200)
                .header("content-type", "text/html")
                .body(CARDS_PAGE);
        });
        server.mock(|when, then| {
            when.method(GET).path_contains("/two/search");
            then.status(500);
        });

        let client = RelatedClient::with_sources(
            None,
            vec![
                mock_site(server.url("/one/search?q=")),
                mock_site(server.url("/two/search?q=")),
            ],
        );
        let related = client.lookup("Beef Stew").await;

        assert_eq!(related.len(), 2);
        assert_eq!(related[0].title, "Hearty Beef Stew");
        assert_eq!(related[1].title, "Slow Cooker Stew");
        assert_eq!(related[0].image_url, "https://img.example.com/lead.jpg");
    }

    #[tokio::test]
    async fn test_lookup_falls_back_when_selectors_find_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("/search");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><body><p>search results moved</p></body></html>");
        });

        let client =
            RelatedClient::with_sources(None, vec![mock_site(server.url("/search?q="))]);
        let related = client.lookup("Beef Stew").await;

        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Similar Beef Stew");
        assert_eq!(related[0].source, "Suggested Recipe");
    }

    #[tokio::test]
    async fn test_lookup_falls_back_when_every_site_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("/search");
            then.status(503);
        });

        let client = RelatedClient::with_sources(
            None,
            vec![
                mock_site(server.url("/search?q=")),
                // Nothing listens here: exercises the request-error path too
                mock_site("http://127.0.0.1:9/search?q=".to_string()),
            ],
        );
        let related = client.lookup("Beef Stew").await;

        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Similar Beef Stew");
        assert_eq!(related[0].image_url, PLACEHOLDER_IMAGE);
        assert_eq!(related[0].source, "Suggested Recipe");
    }

    #[tokio::test]
    async fn test_lookup_search_results_come_first_and_cap_holds() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"items": [
                        {"title": "Stew One", "link": "https://www.a.com/1",
                         "pagemap": {"cse_thumbnail": [{"src": "https://t.example.com/1.jpg"}]}},
                        {"title": "Stew Two", "link": "https://www.b.com/2",
                         "pagemap": {"cse_thumbnail": [{"src": "https://t.example.com/2.jpg"}]}},
                        {"title": "Stew Three", "link": "https://www.c.com/3",
                         "pagemap": {"cse_thumbnail": [{"src": "https://t.example.com/3.jpg"}]}}
                    ]}"#,
                );
        });
        server.mock(|when, then| {
            when.method(GET).path("/one/search");
            then.status(200)
                .header("content-type", "text/html")
                .body(CARDS_PAGE);
        });
        let skipped_site = server.mock(|when, then| {
            when.method(GET).path("/two/search");
            then.status(200)
                .header("content-type", "text/html")
                .body(CARDS_PAGE);
        });

        let search = search::SearchConfig {
            engine_id: "engine-1".to_string(),
            api_key: "key-1".to_string(),
            endpoint: server.url("/customsearch/v1"),
        };
        let client = RelatedClient::with_sources(
            Some(search),
            vec![
                mock_site(server.url("/one/search?q=")),
                mock_site(server.url("/two/search?q=")),
            ],
        );
        let related = client.lookup("Beef Stew").await;

        assert_eq!(related.len(), 5);
        assert_eq!(related[0].title, "Stew One");
        assert_eq!(related[2].title, "Stew Three");
        assert_eq!(related[3].title, "Hearty Beef Stew");
        assert_eq!(related[4].title, "Slow Cooker Stew");
        // Five records were already in hand, so the second site is never hit
        assert_eq!(skipped_site.hits(), 0);
    }
}
