//! News search API client and summary extraction.
//!
//! Talks to a NewsAPI-compatible search endpoint
//! (`https://newsapi.org/v2/everything`) and produces the joined summary
//! text the synthesis prompt is built from. Searches request up to 10
//! English-language results sorted by relevance.
//!
//! # Failure Behavior
//!
//! [`NewsClient::search_articles`] surfaces transport and API-envelope
//! failures as typed errors. [`NewsClient::fetch_summary_text`] is the
//! pipeline entry point: it logs those failures and returns an empty
//! summary, so downstream code sees the same thing for a failed search and
//! a genuinely empty one.

use crate::error::{Error, Result};
use crate::models::{Article, NewsSearchResponse};
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Base URL of the news search API.
const NEWS_API_BASE: &str = "https://newsapi.org/v2";

/// Results requested per search; relevance ordering happens server-side.
const SEARCH_PAGE_SIZE: u32 = 10;

/// Client for the news search API.
pub struct NewsClient {
    http: Client,
    api_key: String,
}

impl fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsClient")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    /// Issue one `everything` search and decode the response envelope.
    async fn everything(&self, query: &str, page_size: u32) -> Result<NewsSearchResponse> {
        let url = format!("{NEWS_API_BASE}/everything");
        let page_size = page_size.to_string();

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        // The API answers errors (bad key, rate limit) with a JSON envelope
        // too, so decode before checking for success.
        let http_status = response.status();
        let body: NewsSearchResponse = response.json().await?;
        if body.status != "ok" {
            return Err(Error::NewsApi {
                code: body.code.unwrap_or_else(|| http_status.to_string()),
                message: body
                    .message
                    .unwrap_or_else(|| "no error message in response".to_string()),
            });
        }
        Ok(body)
    }

    /// Search for articles matching `query`.
    ///
    /// Requests up to 10 English results sorted by relevance. An empty
    /// result list and a failed search are distinct here; callers that want
    /// the collapsed behavior use [`NewsClient::fetch_summary_text`].
    #[instrument(level = "info", skip_all, fields(%query))]
    pub async fn search_articles(&self, query: &str) -> Result<Vec<Article>> {
        let body = self.everything(query, SEARCH_PAGE_SIZE).await?;
        info!(
            count = body.articles.len(),
            total_results = body.total_results,
            "Fetched news articles"
        );
        debug!(
            titles = ?body
                .articles
                .iter()
                .filter_map(|a| a.title.as_deref())
                .collect::<Vec<_>>(),
            "Article titles"
        );
        Ok(body.articles)
    }

    /// Fetch articles for `query` and join their descriptions into one string.
    ///
    /// This is the fetch step the presentation layer drives. Search failures
    /// are logged and collapsed into an empty summary, matching the "no
    /// results" outcome.
    #[instrument(level = "info", skip_all, fields(%query))]
    pub async fn fetch_summary_text(&self, query: &str) -> String {
        let articles = match self.search_articles(query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "News search failed; treating as no results");
                return String::new();
            }
        };

        let summary = join_descriptions(&articles);
        info!(
            articles = articles.len(),
            summary_bytes = summary.len(),
            preview = %truncate_for_log(&summary, 200),
            "Joined article descriptions"
        );
        summary
    }

    /// Probe the API with a one-result search, for the `check` command.
    ///
    /// Returns the server-side total match count for the report.
    #[instrument(level = "info", skip_all)]
    pub async fn check_connection(&self) -> Result<u64> {
        let body = self.everything("python", 1).await?;
        info!(total_results = body.total_results, "News API reachable");
        Ok(body.total_results)
    }
}

/// Join the descriptions of `articles` with single spaces.
///
/// Articles without a description, or with an empty one, are discarded;
/// the rest contribute in their original order. Empty input yields an
/// empty string.
pub fn join_descriptions(articles: &[Article]) -> String {
    articles
        .iter()
        .filter_map(|article| article.description.as_deref())
        .filter(|description| !description.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_with_description(description: Option<&str>) -> Article {
        Article {
            source: None,
            author: None,
            title: None,
            description: description.map(str::to_string),
            url: None,
            published_at: None,
        }
    }

    #[test]
    fn test_join_descriptions_skips_articles_without_one() {
        let articles = vec![
            article_with_description(Some("A")),
            article_with_description(None),
            article_with_description(Some("B")),
        ];
        assert_eq!(join_descriptions(&articles), "A B");
    }

    #[test]
    fn test_join_descriptions_empty_input() {
        assert_eq!(join_descriptions(&[]), "");
    }

    #[test]
    fn test_join_descriptions_skips_empty_strings() {
        let articles = vec![
            article_with_description(Some("")),
            article_with_description(Some("Only real text survives.")),
            article_with_description(Some("")),
        ];
        assert_eq!(join_descriptions(&articles), "Only real text survives.");
    }

    #[test]
    fn test_join_descriptions_preserves_order() {
        let articles = vec![
            article_with_description(Some("first")),
            article_with_description(Some("second")),
            article_with_description(Some("third")),
        ];
        assert_eq!(join_descriptions(&articles), "first second third");
    }

    #[test]
    fn test_join_descriptions_all_missing() {
        let articles = vec![
            article_with_description(None),
            article_with_description(None),
        ];
        assert_eq!(join_descriptions(&articles), "");
    }
}
