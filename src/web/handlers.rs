use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::naming::NameParser;
use crate::utils::CinerateResult;

use super::views::{self, SettingsStatus};
use super::AppState;

/// Fields posted by the settings form.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    /// One expression per line.
    pub name_expressions: String,
    pub title_fallback_expression: String,
    pub title_cleanup_expression: String,
    pub extension_expression: String,
    pub provider: String,
    /// Empty keeps the current key.
    #[serde(default)]
    pub api_key: String,
}

impl SettingsForm {
    pub fn apply_to(self, config: &mut Config) {
        config.parser.name_expressions = self
            .name_expressions
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        config.parser.title_fallback_expression = self.title_fallback_expression.trim().to_string();
        config.parser.title_cleanup_expression = self.title_cleanup_expression.trim().to_string();
        config.parser.extension_expression = self.extension_expression.trim().to_string();
        config.api.provider = self.provider.trim().to_string();

        let key = self.api_key.trim();
        if !key.is_empty() {
            config.api.api_key = key.to_string();
        }
    }
}

pub async fn movie_list(State(state): State<AppState>) -> Html<String> {
    Html(views::movie_list_page(&state.movies).into_string())
}

pub async fn settings_page(State(state): State<AppState>) -> Html<String> {
    let config = state.config.read().await;
    Html(views::settings_page(&config, &SettingsStatus::Viewing).into_string())
}

pub async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> CinerateResult<Response> {
    // held until the new settings are on disk and in memory
    let mut config = state.config.write().await;
    let mut updated = config.clone();
    form.apply_to(&mut updated);

    if updated.parser.name_expressions.is_empty() {
        let status = SettingsStatus::Invalid("at least one title/year expression is required".to_string());
        return Ok(invalid(&updated, status));
    }
    if let Err(e) = NameParser::new(&updated.parser) {
        warn!(target: "cinerate::settings", "Rejected settings: {e}");
        return Ok(invalid(&updated, SettingsStatus::Invalid(e.to_string())));
    }

    updated.save_user_settings(&state.assets_dir).await?;
    *config = updated;
    info!(target: "cinerate::settings", provider = %config.api.provider, "Settings updated");

    Ok(Html(views::settings_page(&config, &SettingsStatus::Saved).into_string()).into_response())
}

fn invalid(config: &Config, status: SettingsStatus) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::settings_page(config, &status).into_string()),
    )
        .into_response()
}
