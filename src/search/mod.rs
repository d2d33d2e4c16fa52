// src/search/mod.rs
use serde::{Deserialize, Serialize};

pub mod aggregator;
pub mod client;
pub mod query;

pub use aggregator::{aggregate, CountryResults, SearchOutcome, TitleResults};
pub use client::SearchClient;

/// One job listing as extracted from the search API. The serde names double
/// as the dataset's CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
}
