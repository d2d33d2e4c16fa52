// src/dataset.rs
//! CSV-backed posting store: load, merge, dedup, rewrite.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::search::JobPosting;

const HEADERS: [&str; 2] = ["Title", "Link"];

/// Outcome of one merge-and-save cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub prior_rows: usize,
    pub new_rows: usize,
    pub total_rows: usize,
    /// True when the existing file could not be read and its rows were
    /// discarded for this save.
    pub prior_discarded: bool,
}

/// Single-writer handle to the dataset file. Every read-modify-write cycle
/// runs under the internal lock, so concurrent submissions cannot interleave.
pub struct DatasetStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DatasetStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored posting. A missing file is an empty dataset; an
    /// unreadable one is an error, left to the caller to recover from.
    pub async fn load(&self) -> Result<Vec<JobPosting>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read dataset: {}", self.path.display()))?;

        decode_csv(&bytes)
            .with_context(|| format!("Failed to parse dataset: {}", self.path.display()))
    }

    /// Merge `new_postings` into the stored dataset and rewrite the file.
    ///
    /// An unreadable existing file does not block the save: its rows are
    /// discarded for this cycle, with the discard logged and flagged in the
    /// returned report.
    pub async fn merge_and_save(&self, new_postings: &[JobPosting]) -> Result<MergeReport> {
        let _guard = self.write_lock.lock().await;

        let (existing, prior_discarded) = match self.load().await {
            Ok(rows) => (rows, false),
            Err(e) => {
                warn!(
                    "Discarding unreadable dataset {}: {:#}",
                    self.path.display(),
                    e
                );
                (Vec::new(), true)
            }
        };

        let prior_rows = existing.len();
        let merged = merge_postings(existing, new_postings.to_vec());

        self.save(&merged).await?;
        info!(
            "Saved {} postings to {}",
            merged.len(),
            self.path.display()
        );

        Ok(MergeReport {
            prior_rows,
            new_rows: new_postings.len(),
            total_rows: merged.len(),
            prior_discarded,
        })
    }

    async fn save(&self, postings: &[JobPosting]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let bytes = encode_csv(postings)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("Failed to write dataset: {}", self.path.display()))
    }
}

/// Concatenate `existing` then `new`, dropping duplicate `(Title, Link)` rows
/// and keeping each key's last occurrence at its position. Matters when a
/// link's title text changes upstream: the fresh row wins.
pub fn merge_postings(existing: Vec<JobPosting>, new: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    let mut merged: Vec<JobPosting> = existing
        .into_iter()
        .chain(new)
        .rev()
        .filter(|posting| seen.insert((posting.title.clone(), posting.link.clone())))
        .collect();
    merged.reverse();
    merged
}

fn encode_csv(postings: &[JobPosting]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        // Header written explicitly so even an empty dataset keeps its shape.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        writer
            .write_record(HEADERS)
            .context("Failed to write dataset header")?;
        for posting in postings {
            writer
                .serialize(posting)
                .context("Failed to encode posting")?;
        }
        writer.flush().context("Failed to flush dataset writer")?;
    }
    Ok(buf)
}

fn decode_csv(bytes: &[u8]) -> Result<Vec<JobPosting>> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader
        .headers()
        .context("Failed to read dataset header")?
        .clone();
    if !headers.iter().eq(HEADERS) {
        anyhow::bail!("Unexpected dataset header: {:?}", headers);
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<JobPosting>() {
        rows.push(record.context("Failed to parse dataset row")?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, link: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    fn temp_dataset(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("jobscout-{}-{}.csv", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn as_key_set(rows: &[JobPosting]) -> HashSet<(String, String)> {
        rows.iter()
            .map(|p| (p.title.clone(), p.link.clone()))
            .collect()
    }

    #[test]
    fn merge_drops_duplicate_keys() {
        let existing = vec![posting("A", "x"), posting("B", "y")];
        let new = vec![posting("A", "x"), posting("C", "z")];

        let merged = merge_postings(existing, new);

        assert_eq!(merged.len(), 3);
        assert_eq!(
            as_key_set(&merged),
            as_key_set(&[posting("A", "x"), posting("B", "y"), posting("C", "z")])
        );
    }

    #[test]
    fn merge_keeps_the_last_occurrence_position() {
        let existing = vec![posting("A", "x"), posting("B", "y")];
        let new = vec![posting("A", "x")];

        let merged = merge_postings(existing, new);

        // The surviving (A, x) row sits where its last occurrence was.
        assert_eq!(merged, vec![posting("B", "y"), posting("A", "x")]);
    }

    #[test]
    fn same_link_different_title_is_two_rows() {
        let merged = merge_postings(
            vec![posting("Old title", "x")],
            vec![posting("New title", "x")],
        );

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn csv_round_trip_preserves_rows() {
        let rows = vec![posting("Professor, tenured", "https://a.example/1"), posting("", "https://a.example/2")];

        let bytes = encode_csv(&rows).unwrap();
        let decoded = decode_csv(&bytes).unwrap();

        assert_eq!(decoded, rows);
    }

    #[test]
    fn decode_rejects_a_foreign_header() {
        assert!(decode_csv(b"name,url\na,b\n").is_err());
        assert!(decode_csv(b"garbage").is_err());
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let store = DatasetStore::new(temp_dataset("missing"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn merge_and_save_round_trips() {
        let path = temp_dataset("roundtrip");
        let store = DatasetStore::new(path.clone());

        let report = store
            .merge_and_save(&[posting("A", "x"), posting("B", "y")])
            .await
            .unwrap();
        assert_eq!(report.prior_rows, 0);
        assert_eq!(report.total_rows, 2);
        assert!(!report.prior_discarded);

        let report = store
            .merge_and_save(&[posting("A", "x"), posting("C", "z")])
            .await
            .unwrap();
        assert_eq!(report.prior_rows, 2);
        assert_eq!(report.new_rows, 2);
        assert_eq!(report.total_rows, 3);

        let rows = store.load().await.unwrap();
        assert_eq!(
            as_key_set(&rows),
            as_key_set(&[posting("A", "x"), posting("B", "y"), posting("C", "z")])
        );

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn unreadable_dataset_is_discarded_and_reported() {
        let path = temp_dataset("corrupt");
        std::fs::write(&path, b"\x00\x01 not a dataset").unwrap();
        let store = DatasetStore::new(path.clone());

        let report = store.merge_and_save(&[posting("A", "x")]).await.unwrap();

        assert!(report.prior_discarded);
        assert_eq!(report.prior_rows, 0);
        assert_eq!(report.total_rows, 1);
        assert_eq!(store.load().await.unwrap(), vec![posting("A", "x")]);

        let _ = std::fs::remove_file(&path);
    }
}
