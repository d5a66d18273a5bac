//! Shared test utilities: default configuration, a ready-made name parser
//! and a throwaway HTTP server standing in for the movie APIs.

use axum::Router;

use crate::config::Config;
use crate::core::naming::NameParser;

/// Built-in configuration, loaded from an empty assets directory so that no
/// local `config.json` leaks into tests.
pub fn default_config() -> Config {
    let dir = tempfile::tempdir().unwrap();
    Config::load(dir.path()).unwrap()
}

pub fn default_parser() -> NameParser {
    NameParser::new(&default_config().parser).unwrap()
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
