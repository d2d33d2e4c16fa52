// src/web/render.rs
//! HTML for the search form and results page, assembled by plain string
//! building. Every dynamic value goes through [`escape_html`].

use crate::config::AppConfig;
use crate::search::TitleResults;

/// Render the page. `None` is a bare form (GET); `Some(&[])` is a submission
/// that found nothing; a non-empty slice is the nested results listing.
pub fn render_page(config: &AppConfig, results: Option<&[TitleResults]>) -> String {
    let mut page = String::new();

    page.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Job Search</title>\n</head>\n<body>\n<h1>Job Search</h1>\n",
    );

    render_form(&mut page, config);

    match results {
        None => {}
        Some([]) => {
            page.push_str("<p class=\"no-results\">No results found.</p>\n");
        }
        Some(rows) => render_results(&mut page, rows),
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn render_form(page: &mut String, config: &AppConfig) {
    page.push_str("<form method=\"post\" action=\"/\">\n");
    render_field(
        page,
        "job_title",
        "Job titles (comma-separated)",
        &config.job_titles,
    );
    render_field(
        page,
        "countries",
        "Countries (comma-separated)",
        &config.countries,
    );
    page.push_str("<button type=\"submit\">Search</button>\n</form>\n");
}

fn render_field(page: &mut String, name: &str, label: &str, options: &[String]) {
    page.push_str(&format!(
        "<label for=\"{0}\">{1}</label>\n\
         <input id=\"{0}\" name=\"{0}\" list=\"{0}_options\">\n\
         <datalist id=\"{0}_options\">\n",
        name, label
    ));
    for option in options {
        page.push_str(&format!(
            "<option value=\"{}\"></option>\n",
            escape_html(option)
        ));
    }
    page.push_str("</datalist>\n");
}

fn render_results(page: &mut String, results: &[TitleResults]) {
    for title_results in results {
        page.push_str(&format!("<h2>{}</h2>\n", escape_html(&title_results.title)));

        for country_results in &title_results.countries {
            page.push_str(&format!(
                "<h3>{}</h3>\n<ul>\n",
                escape_html(&country_results.country)
            ));
            for posting in &country_results.postings {
                page.push_str(&format!(
                    "<li><a href=\"{}\">{}</a></li>\n",
                    escape_html(&posting.link),
                    escape_html(&posting.title)
                ));
            }
            page.push_str("</ul>\n");
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
