pub mod omdb;
pub mod tmdb;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::models::MovieMetadata;
use crate::utils::{CinerateResult, Error};

pub use omdb::OmdbInformer;
pub use tmdb::TmdbInformer;

/// Something that can resolve a (title, year) pair to movie metadata.
#[async_trait]
pub trait MovieInformer: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the provider does not know the movie.
    async fn lookup(&self, title: &str, year: Option<u16>) -> CinerateResult<Option<MovieMetadata>>;
}

/// Never finds anything; used when no provider is configured.
#[derive(Debug, Clone, Default)]
pub struct OfflineInformer;

#[async_trait]
impl MovieInformer for OfflineInformer {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn lookup(&self, _title: &str, _year: Option<u16>) -> CinerateResult<Option<MovieMetadata>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieApi {
    Omdb,
    Tmdb,
    Offline,
}

impl FromStr for MovieApi {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "omdb" => MovieApi::Omdb,
            "tmdb" => MovieApi::Tmdb,
            // "rt" and unknown names
            _ => MovieApi::Offline,
        })
    }
}

pub(crate) fn build_client(cfg: &ApiConfig) -> CinerateResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .user_agent(concat!("cinerate/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Read a JSON body, turning non-2xx statuses into [`Error::ApiError`].
pub(crate) async fn read_json<T: for<'de> serde::Deserialize<'de>>(
    provider: &str,
    resp: reqwest::Response,
) -> CinerateResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::ApiError(format!(
            "{provider} request failed: HTTP {status} body={body}"
        )));
    }
    Ok(resp.json::<T>().await?)
}

/// Pick the informer matching `api.provider`.
pub fn select_informer(api: &ApiConfig) -> CinerateResult<Arc<dyn MovieInformer>> {
    let kind = api.provider.parse::<MovieApi>().unwrap_or(MovieApi::Offline);

    if kind != MovieApi::Offline && api.api_key.trim().is_empty() {
        tracing::warn!(
            "No API key configured for '{}': movie lookups are disabled",
            api.provider
        );
        return Ok(Arc::new(OfflineInformer));
    }

    let informer: Arc<dyn MovieInformer> = match kind {
        MovieApi::Omdb => Arc::new(OmdbInformer::new(api)?),
        MovieApi::Tmdb => Arc::new(TmdbInformer::new(api)?),
        MovieApi::Offline => {
            let name = api.provider.trim().to_ascii_lowercase();
            if !matches!(name.as_str(), "" | "none" | "offline") {
                tracing::warn!("Unknown movie API '{}': movie lookups are disabled", api.provider);
            }
            Arc::new(OfflineInformer)
        }
    };
    tracing::info!("Using '{}' for movie lookups", informer.name());
    Ok(informer)
}
