pub mod handlers;
pub mod views;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::models::Movie;
use crate::utils::{CinerateResult, Error};

/// Shared state behind every handler. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Sorted library, fixed for the lifetime of the server.
    pub movies: Arc<Vec<Movie>>,
    /// Live configuration, replaced by the settings page.
    pub config: Arc<RwLock<Config>>,
    /// `js/` and `css/` are served under `/static`; `userConfig.json` is written here.
    pub assets_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(movies: Vec<Movie>, config: Config, assets_dir: PathBuf) -> Self {
        Self {
            movies: Arc::new(movies),
            config: Arc::new(RwLock::new(config)),
            assets_dir: Arc::new(assets_dir),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    // only the asset subtrees; the assets root also holds the config files
    let js = ServeDir::new(state.assets_dir.join("js"));
    let css = ServeDir::new(state.assets_dir.join("css"));

    Router::new()
        .route("/", get(handlers::movie_list))
        .route(
            "/settings",
            get(handlers::settings_page).post(handlers::save_settings),
        )
        .nest_service("/static/js", js)
        .nest_service("/static/css", css)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> CinerateResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        return;
    }
    tracing::info!("Shutting down");
}
