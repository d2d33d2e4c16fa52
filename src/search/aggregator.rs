// src/search/aggregator.rs
use std::future::Future;

use tracing::info;

use super::client::SearchClient;
use super::query::build_query;
use super::JobPosting;

/// Pages requested per (title, country) pair: one upstream call each.
const PAGES_PER_PAIR: usize = 1;

/// Postings for one country under one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryResults {
    pub country: String,
    pub postings: Vec<JobPosting>,
}

/// Per-country postings for one submitted title. Countries that returned
/// nothing are omitted rather than kept as empty lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleResults {
    pub title: String,
    pub countries: Vec<CountryResults>,
}

/// Everything one submission produced: the nested view for rendering and the
/// flat posting list for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub results: Vec<TitleResults>,
    pub postings: Vec<JobPosting>,
}

/// Run one search per (title, country) pair against the live client.
pub async fn aggregate(
    client: &SearchClient,
    titles: &[String],
    countries: &[String],
) -> SearchOutcome {
    aggregate_with(titles, countries, |query| async move {
        client.fetch(&query, PAGES_PER_PAIR).await
    })
    .await
}

/// Pair-driving core, generic over the fetch operation.
///
/// Pairs run strictly sequentially: titles in submission order, countries in
/// submission order within each title. A pair whose fetch comes back empty
/// contributes nothing and does not stop the remaining pairs.
pub async fn aggregate_with<F, Fut>(
    titles: &[String],
    countries: &[String],
    fetch: F,
) -> SearchOutcome
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Vec<JobPosting>>,
{
    let mut results = Vec::new();
    let mut all_postings = Vec::new();

    for title in titles {
        let mut by_country = Vec::new();

        for country in countries {
            let query = build_query(title, country);
            info!("Searching for '{}'", query);

            let postings = fetch(query).await;
            if postings.is_empty() {
                continue;
            }

            all_postings.extend(postings.iter().cloned());
            by_country.push(CountryResults {
                country: country.clone(),
                postings,
            });
        }

        if !by_country.is_empty() {
            results.push(TitleResults {
                title: title.clone(),
                countries: by_country,
            });
        }
    }

    SearchOutcome {
        results,
        postings: all_postings,
    }
}
