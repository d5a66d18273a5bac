use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::core;
use crate::core::informer::MovieInformer;
use crate::models::Movie;
use crate::utils::CinerateResult;

/// Look every movie up concurrently, one task per movie.
///
/// Results come back in completion order. A movie whose lookup fails or
/// finds nothing is returned as it was, without metadata.
pub async fn enrich_movies(movies: Vec<Movie>, informer: Arc<dyn MovieInformer>) -> Vec<Movie> {
    let total = movies.len();
    let (tx, mut rx) = mpsc::unbounded_channel();

    for mut movie in movies {
        let tx = tx.clone();
        let informer = Arc::clone(&informer);
        tokio::spawn(async move {
            // the lookup runs in its own task so a panicking informer
            // still leaves us holding the record
            let (title, year) = (movie.title.clone(), movie.year);
            let lookup = tokio::spawn(async move { informer.lookup(&title, year).await });

            match lookup.await {
                Ok(Ok(Some(metadata))) => movie.metadata = Some(metadata),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    warn!(target: "cinerate::lookup", title = %movie.title, year = ?movie.year, "Error getting movie details: {e}");
                }
                Err(e) => {
                    warn!(target: "cinerate::lookup", title = %movie.title, year = ?movie.year, "Lookup task failed: {e}");
                }
            }
            let _ = tx.send(movie);
        });
    }
    // only the tasks hold senders now; recv() ends once they are all done
    drop(tx);

    let mut enriched = Vec::with_capacity(total);
    while let Some(movie) = rx.recv().await {
        enriched.push(movie);
    }

    if enriched.len() != total {
        warn!(target: "cinerate::lookup", total, received = enriched.len(), "Some movies were lost during lookup");
    }

    let found = enriched.iter().filter(|m| m.is_enriched()).count();
    info!(target: "cinerate::lookup", total, found, provider = informer.name(), "Lookups finished");
    enriched
}

/// Title order (byte-wise), then year, then path.
pub fn sort_movies(movies: &mut [Movie]) {
    movies.sort_by(|a, b| {
        a.title
            .cmp(&b.title)
            .then_with(|| a.year.cmp(&b.year))
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// Walk, parse, look up and sort: everything the main page shows.
pub async fn collect_library(roots: &[PathBuf], config: &Config) -> CinerateResult<Vec<Movie>> {
    let parser = core::naming::NameParser::new(&config.parser)?;
    let informer = core::informer::select_informer(&config.api)?;

    // walkdir is blocking
    let scan_roots = roots.to_vec();
    let movies = tokio::task::spawn_blocking(move || core::fs::scan_all(&scan_roots, &parser))
        .await
        .map_err(|e| crate::utils::Error::Other(format!("Scan task failed: {e}")))?;
    info!("Found {} movie file(s) under {} folder(s)", movies.len(), roots.len());

    let mut movies = enrich_movies(movies, informer).await;
    sort_movies(&mut movies);
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::MovieMetadata;
    use crate::utils::Error;

    /// Knows every movie except "Broken" (error), "Unknown" (not found)
    /// and "Panic", which brings the lookup down.
    struct FakeInformer;

    #[async_trait]
    impl MovieInformer for FakeInformer {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn lookup(&self, title: &str, year: Option<u16>) -> CinerateResult<Option<MovieMetadata>> {
            match title {
                "Broken" => Err(Error::ApiError("boom".to_string())),
                "Unknown" => Ok(None),
                "Panic" => panic!("informer bug"),
                _ => Ok(Some(MovieMetadata {
                    imdb_id: Some(format!("tt-{title}-{}", year.unwrap_or_default())),
                    ..Default::default()
                })),
            }
        }
    }

    #[tokio::test]
    async fn every_movie_comes_back_even_on_failure() {
        let movies = vec![
            Movie::new("Joker", Some(2019), "/m/joker.mkv"),
            Movie::new("Broken", None, "/m/broken.mkv"),
            Movie::new("Unknown", Some(1990), "/m/unknown.mkv"),
            Movie::new("Heat", Some(1995), "/m/heat.mkv"),
        ];

        let mut enriched = enrich_movies(movies, Arc::new(FakeInformer)).await;
        sort_movies(&mut enriched);

        let titles: Vec<&str> = enriched.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Broken", "Heat", "Joker", "Unknown"]);

        assert!(enriched[0].metadata.is_none());
        assert_eq!(
            enriched[2].metadata.as_ref().and_then(|m| m.imdb_id.as_deref()),
            Some("tt-Joker-2019")
        );
        assert!(enriched[3].metadata.is_none());
    }

    #[tokio::test]
    async fn a_panicking_lookup_keeps_the_movie() {
        let movies = vec![
            Movie::new("Panic", Some(2000), "/m/panic.mkv"),
            Movie::new("Heat", Some(1995), "/m/heat.mkv"),
        ];

        let mut enriched = enrich_movies(movies, Arc::new(FakeInformer)).await;
        sort_movies(&mut enriched);

        assert_eq!(enriched.len(), 2);
        assert!(enriched[0].is_enriched());
        assert_eq!(enriched[1].title, "Panic");
        assert_eq!(enriched[1].year, Some(2000));
        assert!(enriched[1].metadata.is_none());
    }

    #[tokio::test]
    async fn empty_list_does_not_wait() {
        let enriched = enrich_movies(Vec::new(), Arc::new(FakeInformer)).await;
        assert!(enriched.is_empty());
    }

    #[test]
    fn sort_is_by_title_then_year_then_path() {
        let mut movies = vec![
            Movie::new("Solaris", Some(2002), "/b.mkv"),
            Movie::new("Alien", None, "/z.mkv"),
            Movie::new("Solaris", Some(1972), "/c.mkv"),
            Movie::new("Alien", None, "/a.mkv"),
        ];
        sort_movies(&mut movies);

        let keys: Vec<(&str, Option<u16>)> =
            movies.iter().map(|m| (m.title.as_str(), m.year)).collect();
        assert_eq!(
            keys,
            vec![
                ("Alien", None),
                ("Alien", None),
                ("Solaris", Some(1972)),
                ("Solaris", Some(2002)),
            ]
        );
        assert_eq!(movies[0].path, PathBuf::from("/a.mkv"));
    }

    #[tokio::test]
    async fn collects_a_folder_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("Solaris (1972).mkv"), b"").unwrap();
        std::fs::write(tmp.path().join("Alien.1979.Directors.Cut.mp4"), b"").unwrap();

        let mut config = crate::test_helpers::default_config();
        config.api.provider = "none".to_string();

        let movies = collect_library(&[tmp.path().to_path_buf()], &config).await.unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Solaris"]);
        assert!(movies.iter().all(|m| !m.is_enriched()));
    }
}
