use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::models::MovieMetadata;
use crate::utils::CinerateResult;

use super::{build_client, read_json, MovieInformer};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w185";
const CAST_LIMIT: usize = 5;

/// v4 read access tokens are JWTs; anything else is a v3 API key.
fn is_access_token(credential: &str) -> bool {
    credential.starts_with("eyJ")
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    #[serde(default)]
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbMovie {
    #[serde(default)]
    genres: Vec<Genre>,
    imdb_id: Option<String>,
    runtime: Option<u32>,
    vote_count: Option<u64>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    credits: Credits,
}

impl TmdbMovie {
    pub(crate) fn into_metadata(self) -> MovieMetadata {
        MovieMetadata {
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            imdb_id: self.imdb_id.filter(|id| !id.is_empty()),
            runtime: self.runtime.filter(|r| *r > 0).map(|r| format!("{r} min")),
            votes: self.vote_count,
            rating: self.vote_average,
            plot: self.overview.filter(|o| !o.trim().is_empty()),
            poster_url: self.poster_path.map(|p| format!("{POSTER_BASE_URL}{p}")),
            director: self
                .credits
                .crew
                .iter()
                .find(|c| c.job.as_deref() == Some("Director"))
                .map(|c| c.name.clone()),
            cast: self
                .credits
                .cast
                .into_iter()
                .take(CAST_LIMIT)
                .map(|c| c.name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbInformer {
    base_url: String,
    credential: String,
    client: reqwest::Client,
}

impl TmdbInformer {
    pub fn new(cfg: &ApiConfig) -> CinerateResult<Self> {
        let base_url = cfg.base_url.as_deref().unwrap_or(TMDB_BASE_URL);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: cfg.api_key.clone(),
            client: build_client(cfg)?,
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> CinerateResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.get(url).header("Accept", "application/json");

        if is_access_token(&self.credential) {
            req = req.bearer_auth(&self.credential);
        } else {
            req = req.query(&[("api_key", self.credential.as_str())]);
        }
        if !query.is_empty() {
            req = req.query(query);
        }

        read_json("TMDB", req.send().await?).await
    }
}

#[async_trait]
impl MovieInformer for TmdbInformer {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn lookup(&self, title: &str, year: Option<u16>) -> CinerateResult<Option<MovieMetadata>> {
        let mut query = vec![("query", title.to_string())];
        if let Some(y) = year {
            query.push(("year", y.to_string()));
        }

        debug!(target: "cinerate::tmdb", title, year = ?year, "Searching TMDB");
        let search: SearchResponse = self.get_json("search/movie", &query).await?;
        let Some(first) = search.results.first() else {
            info!(target: "cinerate::tmdb", title, "Movie not found");
            return Ok(None);
        };

        let movie: TmdbMovie = self
            .get_json(
                &format!("movie/{}", first.id),
                &[("append_to_response", "credits".to_string())],
            )
            .await?;
        Ok(Some(movie.into_metadata()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::utils::Error;
    use crate::test_helpers::serve_stub;

    fn heat() -> Value {
        json!({
            "id": 949,
            "title": "Heat",
            "imdb_id": "tt0113277",
            "runtime": 170,
            "vote_count": 7000,
            "vote_average": 7.9,
            "overview": "Obsessive master thief Neil McCauley leads a top-notch crew.",
            "poster_path": "/heat.jpg",
            "genres": [{ "id": 28, "name": "Action" }, { "id": 80, "name": "Crime" }],
            "credits": {
                "cast": [
                    { "name": "Al Pacino" }, { "name": "Robert De Niro" }, { "name": "Val Kilmer" },
                    { "name": "Jon Voight" }, { "name": "Tom Sizemore" }, { "name": "Diane Venora" }
                ],
                "crew": [
                    { "name": "Art Linson", "job": "Producer" },
                    { "name": "Michael Mann", "job": "Director" }
                ]
            }
        })
    }

    async fn stub_tmdb() -> String {
        let router = Router::new()
            .route(
                "/search/movie",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    if q.get("api_key").map(String::as_str) != Some("v3key") {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    let results = match q.get("query").map(String::as_str) {
                        Some("Heat") => json!([{ "id": 949 }]),
                        _ => json!([]),
                    };
                    Ok(Json(json!({ "page": 1, "results": results })))
                }),
            )
            .route(
                "/movie/{id}",
                get(|Path(id): Path<i64>| async move {
                    if id == 949 {
                        Ok(Json(heat()))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }),
            );
        serve_stub(router).await
    }

    fn informer(base_url: String, key: &str) -> TmdbInformer {
        TmdbInformer::new(&ApiConfig {
            provider: "tmdb".to_string(),
            api_key: key.to_string(),
            base_url: Some(base_url),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn maps_details_and_credits() {
        let movie: TmdbMovie = serde_json::from_value(heat()).unwrap();
        let meta = movie.into_metadata();

        assert_eq!(meta.genres, vec!["Action", "Crime"]);
        assert_eq!(meta.runtime.as_deref(), Some("170 min"));
        assert_eq!(meta.director.as_deref(), Some("Michael Mann"));
        assert_eq!(meta.cast.len(), CAST_LIMIT);
        assert_eq!(
            meta.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/heat.jpg")
        );
    }

    #[test]
    fn access_tokens_are_detected() {
        assert!(is_access_token("eyJhbGciOiJIUzI1NiJ9.payload.sig"));
        assert!(!is_access_token("0123456789abcdef"));
    }

    #[tokio::test]
    async fn searches_then_fetches_details() {
        let base = stub_tmdb().await;
        let meta = informer(base, "v3key")
            .lookup("Heat", Some(1995))
            .await
            .unwrap()
            .expect("movie should be found");
        assert_eq!(meta.imdb_id.as_deref(), Some("tt0113277"));
        assert_eq!(meta.votes, Some(7000));
    }

    #[tokio::test]
    async fn empty_search_is_none() {
        let base = stub_tmdb().await;
        let found = informer(base, "v3key").lookup("Nope", None).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn http_errors_are_reported() {
        let base = stub_tmdb().await;
        let err = informer(base, "bad").lookup("Heat", None).await.unwrap_err();
        assert!(matches!(err, Error::ApiError(ref m) if m.contains("401")));
    }
}
