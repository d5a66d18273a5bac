//! HTML pages, rendered with [maud](https://maud.lambda.xyz/).

use maud::{html, Markup, DOCTYPE};

use crate::config::Config;
use crate::models::Movie;

/// Outcome shown at the top of the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsStatus {
    Viewing,
    Saved,
    Invalid(String),
}

const PROVIDERS: [(&str, &str); 3] = [
    ("omdb", "OMDb"),
    ("tmdb", "TMDB"),
    ("none", "None (offline)"),
];

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/css/style.css";
                script src="/static/js/functions.js" defer {}
            }
            body {
                header.site-header {
                    nav {
                        a href="/" { "Movies" }
                        " | "
                        a href="/settings" { "Settings" }
                    }
                }
                main { (content) }
            }
        }
    }
}

fn optional(value: Option<&str>) -> Markup {
    html! {
        @if let Some(v) = value { (v) } @else { span.muted { "-" } }
    }
}

fn movie_row(movie: &Movie) -> Markup {
    let meta = movie.metadata.as_ref();
    html! {
        tr class=[(!movie.is_enriched()).then_some("not-found")] {
            td.poster {
                @if let Some(url) = meta.and_then(|m| m.poster_url.as_deref()) {
                    img src=(url) alt=(movie.title) loading="lazy";
                }
            }
            td.title {
                @if let Some(url) = movie.imdb_url() {
                    a href=(url) target="_blank" rel="noopener" { (movie.title) }
                } @else {
                    (movie.title)
                }
            }
            td.year { @if let Some(y) = movie.year { (y) } }
            td.genre { (meta.map(|m| m.genres.join(", ")).unwrap_or_default()) }
            td.rating data-sort=(meta.and_then(|m| m.rating).unwrap_or(0.0)) {
                @if let Some(r) = meta.and_then(|m| m.rating) { (format!("{r:.1}")) }
            }
            td.votes data-sort=(meta.and_then(|m| m.votes).unwrap_or(0)) {
                @if let Some(v) = meta.and_then(|m| m.votes) { (v) }
            }
            td.runtime { (optional(meta.and_then(|m| m.runtime.as_deref()))) }
            td.director { (optional(meta.and_then(|m| m.director.as_deref()))) }
            td.cast { (meta.map(|m| m.cast.join(", ")).unwrap_or_default()) }
            td.plot { (optional(meta.and_then(|m| m.plot.as_deref()))) }
            td.path { code { (movie.path.display()) } }
        }
    }
}

/// Main page: one table row per movie.
pub fn movie_list_page(movies: &[Movie]) -> Markup {
    let content = html! {
        div.toolbar {
            input.searchTB type="search" placeholder="Filter by title..." oninput="filterMovies()" autofocus;
            span #numberOfMovies { (movies.len()) " Movies found" }
        }
        table.sortable {
            thead {
                tr {
                    th { "Poster" }
                    th { "Title" }
                    th { "Year" }
                    th { "Genre" }
                    th { "Rating" }
                    th { "Votes" }
                    th { "Runtime" }
                    th { "Director" }
                    th { "Cast" }
                    th { "Plot" }
                    th { "File" }
                }
            }
            tbody {
                @for movie in movies {
                    (movie_row(movie))
                }
            }
        }
    };
    layout("Movies", content)
}

pub fn settings_page(config: &Config, status: &SettingsStatus) -> Markup {
    let parser = &config.parser;
    let provider = config.api.provider.to_ascii_lowercase();
    let has_key = !config.api.api_key.is_empty();

    let content = html! {
        h1 { "Settings" }
        @match status {
            SettingsStatus::Saved => {
                p.notice.success { "Settings saved. They apply to the next scan." }
            }
            SettingsStatus::Invalid(reason) => {
                p.notice.error { "Settings not saved: " (reason) }
            }
            SettingsStatus::Viewing => {}
        }
        form method="post" action="/settings" {
            fieldset {
                legend { "File names" }
                label for="name_expressions" { "Title/year expressions (one per line, tried in order)" }
                textarea #name_expressions name="name_expressions" rows="4" spellcheck="false" {
                    (parser.name_expressions.join("\n"))
                }
                label for="title_fallback_expression" { "Title-only fallback expression" }
                input #title_fallback_expression name="title_fallback_expression" type="text" value=(parser.title_fallback_expression);
                label for="title_cleanup_expression" { "Title cleanup expression" }
                input #title_cleanup_expression name="title_cleanup_expression" type="text" value=(parser.title_cleanup_expression);
                label for="extension_expression" { "Video extension expression" }
                input #extension_expression name="extension_expression" type="text" value=(parser.extension_expression);
            }
            fieldset {
                legend { "Movie API" }
                label for="provider" { "Provider" }
                select #provider name="provider" {
                    @for (value, label) in PROVIDERS {
                        option value=(value) selected[provider == value] { (label) }
                    }
                }
                label for="api_key" { "API key" }
                input #api_key name="api_key" type="password" autocomplete="off"
                    placeholder=(if has_key { "unchanged" } else { "" });
            }
            button type="submit" { "Save" }
        }
    };
    layout("Settings", content)
}
