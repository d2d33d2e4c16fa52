// src/search/query.rs

/// Compose the search string for one (job title, country) pair.
pub fn build_query(job_title: &str, country: &str) -> String {
    format!("{} jobs in {}", job_title, country)
}

/// Split a comma-separated form field into trimmed, non-empty terms.
pub fn split_terms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
