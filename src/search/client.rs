// src/search/client.rs
use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use super::JobPosting;
use crate::config::AppConfig;

/// Results per page of the search API; `start` offsets advance by this much.
const PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    link: Option<String>,
}

/// Client for the external search endpoint.
pub struct SearchClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SearchClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.search_base_url.clone(),
        })
    }

    /// Fetch up to `page_count` pages of results for `query`, deduplicated by
    /// link (first occurrence wins).
    ///
    /// An empty return means "failed, or genuinely no results" - the two are
    /// indistinguishable by contract. A transport or parse failure on any
    /// page discards the whole invocation, earlier pages included.
    pub async fn fetch(&self, query: &str, page_count: usize) -> Vec<JobPosting> {
        match self.try_fetch(query, page_count).await {
            Ok(postings) => postings,
            Err(e) => {
                warn!("Search failed for '{}': {:#}", query, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, query: &str, page_count: usize) -> Result<Vec<JobPosting>> {
        let mut seen = HashSet::new();
        let mut postings = Vec::new();

        for page in 0..page_count {
            let start = page * PAGE_SIZE;
            let response = self
                .search_page(query, start)
                .await
                .with_context(|| format!("Search request failed (start={})", start))?;
            collect_postings(response, &mut seen, &mut postings);
        }

        info!("Search for '{}' returned {} postings", query, postings.len());
        Ok(postings)
    }

    async fn search_page(&self, query: &str, start: usize) -> Result<SearchResponse> {
        let url = format!("{}/search.json", self.base_url);
        let start_param = start.to_string();

        // Request URLs carry the api_key; strip them from reqwest errors so
        // the credential cannot reach the logs.
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("q", query),
                ("start", start_param.as_str()),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Search API returned status {}", status);
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse search response")
    }
}

/// Keep the first occurrence per link; entries without a link are dropped.
fn collect_postings(
    response: SearchResponse,
    seen: &mut HashSet<String>,
    postings: &mut Vec<JobPosting>,
) {
    for result in response.organic_results {
        if let Some(link) = result.link {
            if seen.insert(link.clone()) {
                postings.push(JobPosting {
                    title: result.title,
                    link,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(results: serde_json::Value) -> SearchResponse {
        serde_json::from_value(json!({ "organic_results": results })).unwrap()
    }

    fn collect(response: SearchResponse) -> Vec<JobPosting> {
        let mut seen = HashSet::new();
        let mut postings = Vec::new();
        collect_postings(response, &mut seen, &mut postings);
        postings
    }

    #[test]
    fn duplicate_links_keep_the_first_occurrence() {
        let postings = collect(response(json!([
            { "title": "First", "link": "https://a.example/job" },
            { "title": "Second", "link": "https://b.example/job" },
            { "title": "Renamed", "link": "https://a.example/job" },
        ])));

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "First");
        assert_eq!(postings[0].link, "https://a.example/job");
        assert_eq!(postings[1].link, "https://b.example/job");
    }

    #[test]
    fn entries_without_a_link_are_excluded() {
        let postings = collect(response(json!([
            { "title": "No link here" },
            { "title": "Kept", "link": "https://a.example/job" },
        ])));

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Kept");
    }

    #[test]
    fn missing_title_defaults_to_empty() {
        let postings = collect(response(json!([
            { "link": "https://a.example/job" },
        ])));

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "");
    }

    #[test]
    fn body_without_organic_results_yields_nothing() {
        let body: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(collect(body).is_empty());
    }

    #[test]
    fn dedup_spans_pages_within_one_invocation() {
        let mut seen = HashSet::new();
        let mut postings = Vec::new();

        collect_postings(
            response(json!([{ "title": "A", "link": "https://a.example/job" }])),
            &mut seen,
            &mut postings,
        );
        collect_postings(
            response(json!([
                { "title": "A again", "link": "https://a.example/job" },
                { "title": "B", "link": "https://b.example/job" },
            ])),
            &mut seen,
            &mut postings,
        );

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "A");
        assert_eq!(postings[1].title, "B");
    }
}
