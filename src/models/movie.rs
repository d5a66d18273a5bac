use std::path::PathBuf;

/// A movie found on disk, optionally enriched with online metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: Option<u16>,
    /// Absolute path of the video file.
    pub path: PathBuf,
    /// `None` until a lookup succeeds.
    pub metadata: Option<MovieMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieMetadata {
    pub genres: Vec<String>,
    pub imdb_id: Option<String>,
    pub runtime: Option<String>, // e.g., "122 min"
    pub votes: Option<u64>,
    pub rating: Option<f64>, // 0-10
    pub plot: Option<String>,
    pub poster_url: Option<String>,
    pub cast: Vec<String>,
    pub director: Option<String>,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: Option<u16>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            year,
            path: path.into(),
            metadata: None,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.metadata.is_some()
    }

    pub fn imdb_url(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.imdb_id.as_deref())
            .map(|id| format!("https://www.imdb.com/title/{id}/"))
    }
}
