// src/web/mod.rs

pub mod render;

use anyhow::Result;
use rocket::form::{Form, FromForm};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::dataset::DatasetStore;
use crate::search::query::split_terms;
use crate::search::{aggregate, SearchClient};
use render::render_page;

#[derive(FromForm)]
pub struct SearchForm {
    pub job_title: String,
    pub countries: String,
}

#[get("/")]
pub async fn index(config: &State<AppConfig>) -> RawHtml<String> {
    RawHtml(render_page(config, None))
}

#[post("/", data = "<form>")]
pub async fn search(
    form: Form<SearchForm>,
    config: &State<AppConfig>,
    client: &State<SearchClient>,
    dataset: &State<DatasetStore>,
) -> RawHtml<String> {
    let titles = split_terms(&form.job_title);
    let countries = split_terms(&form.countries);

    info!(
        "Form submission: {} title(s), {} country(ies)",
        titles.len(),
        countries.len()
    );

    let outcome = aggregate(client, &titles, &countries).await;

    if outcome.postings.is_empty() {
        return RawHtml(render_page(config, Some(&[])));
    }

    // A failed save still renders the results page; the user-visible outcome
    // of every failure mode is fewer results, never an error page.
    match dataset.merge_and_save(&outcome.postings).await {
        Ok(report) => {
            if report.prior_discarded {
                warn!("Prior dataset rows were discarded during this save");
            }
            info!(
                "Dataset now holds {} postings ({} fetched this request)",
                report.total_rows, report.new_rows
            );
        }
        Err(e) => error!("Failed to save postings: {:#}", e),
    }

    RawHtml(render_page(config, Some(&outcome.results)))
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    Json("OK")
}

/// Assemble the Rocket instance; separate from launch so tests can drive it
/// with a local client.
pub fn build_rocket(config: AppConfig) -> Result<rocket::Rocket<rocket::Build>> {
    let client = SearchClient::new(&config)?;
    let dataset = DatasetStore::new(config.dataset_path.clone());
    let figment = rocket::Config::figment().merge(("port", config.port));

    Ok(rocket::custom(figment)
        .manage(client)
        .manage(dataset)
        .manage(config)
        .mount("/", routes![index, search, health]))
}

pub async fn start_web_server(config: AppConfig) -> Result<()> {
    info!("Dataset file: {}", config.dataset_path.display());
    info!("Search endpoint: {}", config.search_base_url);
    info!("Server: http://127.0.0.1:{}", config.port);

    let _rocket = build_rocket(config)?.launch().await?;
    Ok(())
}
