// src/config.rs
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_DATASET_PATH: &str = "jobs.csv";
const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const DEFAULT_PORT: u16 = 8000;

/// Runtime configuration, resolved once at startup and passed explicitly to
/// every component that needs it.
pub struct AppConfig {
    /// Search API credential. Opaque to this crate: never validated, rotated,
    /// logged, or rendered.
    pub api_key: String,
    pub dataset_path: PathBuf,
    pub search_base_url: String,
    pub port: u16,
    /// Suggested job titles offered on the search form.
    pub job_titles: Vec<String>,
    /// Suggested countries offered on the search form.
    pub countries: Vec<String>,
}

/// Optional overrides read from config.yaml in the working directory.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    dataset_path: Option<PathBuf>,
    search_base_url: Option<String>,
    port: Option<u16>,
    job_titles: Option<Vec<String>>,
    countries: Option<Vec<String>>,
}

impl AppConfig {
    /// Load configuration from the environment plus an optional config.yaml.
    /// Only the API key is required; everything else has a default.
    pub fn load() -> Result<Self> {
        let api_key = std::env::var("SERPAPI_KEY")
            .context("SERPAPI_KEY environment variable not set")?;

        let base_url_override = std::env::var("SERPAPI_BASE_URL").ok();

        let port_override = match std::env::var("ROCKET_PORT") {
            Ok(raw) => Some(
                raw.parse::<u16>()
                    .context("ROCKET_PORT must be a valid port number")?,
            ),
            Err(_) => None,
        };

        let file = Self::load_file()?;

        Ok(Self::assemble(
            api_key,
            base_url_override,
            port_override,
            file,
        ))
    }

    fn load_file() -> Result<ConfigFile> {
        let path = PathBuf::from(CONFIG_FILE);
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(&path).context("Failed to read config.yaml")?;
        serde_yaml::from_str(&content).context("Failed to parse config.yaml")
    }

    fn assemble(
        api_key: String,
        base_url_override: Option<String>,
        port_override: Option<u16>,
        file: ConfigFile,
    ) -> Self {
        let search_base_url = base_url_override
            .or(file.search_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            dataset_path: file
                .dataset_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH)),
            search_base_url: search_base_url.trim_end_matches('/').to_string(),
            port: port_override.or(file.port).unwrap_or(DEFAULT_PORT),
            job_titles: file.job_titles.unwrap_or_else(default_job_titles),
            countries: file.countries.unwrap_or_else(default_countries),
        }
    }
}

// The credential must never end up in logs, so Debug is written by hand.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("dataset_path", &self.dataset_path)
            .field("search_base_url", &self.search_base_url)
            .field("port", &self.port)
            .field("job_titles", &self.job_titles)
            .field("countries", &self.countries)
            .finish()
    }
}

fn default_job_titles() -> Vec<String> {
    [
        "Professor",
        "Associate Professor",
        "Assistant Professor",
        "Lecturer",
        "Researcher",
        "Postdoctoral Fellow",
        "Dean",
        "Department Chair",
        "Software Engineer",
        "Product Manager",
        "Data Scientist",
        "Web Developer",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_countries() -> Vec<String> {
    [
        "United States",
        "United Kingdom",
        "Canada",
        "Germany",
        "Australia",
        "Netherlands",
        "France",
        "Singapore",
        "Switzerland",
        "Sweden",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
