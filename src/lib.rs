pub mod config;
pub mod dataset;
pub mod search;
pub mod web;

pub use config::AppConfig;
pub use dataset::{DatasetStore, MergeReport};
pub use search::{JobPosting, SearchClient};
pub use web::start_web_server;
