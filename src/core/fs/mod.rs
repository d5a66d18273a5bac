use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::naming::NameParser;
use crate::models::Movie;

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Build the movie entry for one video file. Names the parser cannot make
/// sense of are still listed, titled after the raw file stem.
fn movie_from_file(path: &Path, parser: &NameParser) -> Movie {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match parser.extract(&stem) {
        Ok(parsed) => Movie::new(parsed.title, parsed.year, absolute(path)),
        Err(e) => {
            warn!(target: "cinerate::scan", path = %path.display(), "{e}");
            Movie::new(stem, None, absolute(path))
        }
    }
}

/// Recursively collect every video file under `root`.
pub fn scan_movies(root: &Path, parser: &NameParser) -> Vec<Movie> {
    info!(target: "cinerate::scan", root = %root.display(), "Scanning for movies");
    let mut movies = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(target: "cinerate::scan", "Couldn't process {}: {e}",
                    e.path().map(|p| p.display().to_string()).unwrap_or_default());
                continue;
            }
        };
        if !entry.file_type().is_file() || !parser.is_video(entry.path()) {
            continue;
        }

        let movie = movie_from_file(entry.path(), parser);
        debug!(target: "cinerate::scan", file = %entry.file_name().to_string_lossy(), title = %movie.title, year = ?movie.year, "Found movie");
        movies.push(movie);
    }

    info!(target: "cinerate::scan", root = %root.display(), count = movies.len(), "Scan finished");
    movies
}

/// [`scan_movies`] over several roots, in the given order.
pub fn scan_all<P: AsRef<Path>>(roots: &[P], parser: &NameParser) -> Vec<Movie> {
    roots
        .iter()
        .flat_map(|root| scan_movies(root.as_ref(), parser))
        .collect()
}
