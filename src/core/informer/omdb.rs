use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::models::MovieMetadata;
use crate::utils::{CinerateResult, Error};

use super::{build_client, read_json, MovieInformer};

pub const OMDB_BASE_URL: &str = "http://www.omdbapi.com";

const NOT_FOUND: &str = "Movie not found!";

/// OMDb answers every field as a string, "N/A" when unknown.
fn available(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "N/A")
}

fn split_list(v: Option<String>) -> Vec<String> {
    available(v)
        .map(|s| {
            s.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbResponse {
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default, rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default, rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
}

impl OmdbResponse {
    fn found(&self) -> bool {
        !self.response.eq_ignore_ascii_case("false")
    }

    pub(crate) fn into_metadata(self) -> MovieMetadata {
        MovieMetadata {
            rating: available(self.imdb_rating).and_then(|r| r.parse::<f64>().ok()),
            votes: available(self.imdb_votes).and_then(|v| v.replace(',', "").parse::<u64>().ok()),
            genres: split_list(self.genre),
            cast: split_list(self.actors),
            imdb_id: available(self.imdb_id),
            runtime: available(self.runtime),
            plot: available(self.plot),
            poster_url: available(self.poster),
            director: available(self.director),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OmdbInformer {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OmdbInformer {
    pub fn new(cfg: &ApiConfig) -> CinerateResult<Self> {
        let base_url = cfg.base_url.as_deref().unwrap_or(OMDB_BASE_URL);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            client: build_client(cfg)?,
        })
    }
}

#[async_trait]
impl MovieInformer for OmdbInformer {
    fn name(&self) -> &'static str {
        "omdb"
    }

    async fn lookup(&self, title: &str, year: Option<u16>) -> CinerateResult<Option<MovieMetadata>> {
        let mut query = vec![("apikey", self.api_key.clone()), ("t", title.to_string())];
        if let Some(y) = year {
            query.push(("y", y.to_string()));
        }

        debug!(target: "cinerate::omdb", title, year = ?year, "Querying OMDb");
        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .header("Accept", "application/json")
            .query(&query)
            .send()
            .await?;

        let body: OmdbResponse = read_json("OMDb", resp).await?;
        if !body.found() {
            let reason = body.error.unwrap_or_default();
            if reason.is_empty() || reason == NOT_FOUND {
                info!(target: "cinerate::omdb", title, "Movie not found");
                return Ok(None);
            }
            return Err(Error::ApiError(format!("OMDb refused '{title}': {reason}")));
        }

        Ok(Some(body.into_metadata()))
    }
}
