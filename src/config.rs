use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::{CinerateResult, Error};

/// File written by the settings page, layered on top of `config.json`.
pub const USER_CONFIG_FILE: &str = "userConfig.json";
pub const CONFIG_FILE: &str = "config.json";

const DEFAULT_CONFIG: &str = include_str!("../assets/config.json");

impl Config {

    /// Layered load: built-in defaults, `<assets>/config.json`,
    /// `<assets>/userConfig.json`, then `CINERATE__*` environment variables.
    pub fn load(assets_dir: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with_env(assets_dir, None)
    }

    /// [`Config::load`] reading the variables from `env` instead of the
    /// process environment when given.
    fn load_with_env(
        assets_dir: &Path,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Json))
            .add_source(config::File::from(assets_dir.join(CONFIG_FILE)).required(false))
            .add_source(config::File::from(assets_dir.join(USER_CONFIG_FILE)).required(false))
            // e.g. CINERATE__API__API_KEY
            .add_source(
                config::Environment::with_prefix("CINERATE")
                    .prefix_separator("__")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Persist the user-editable sections to `<assets>/userConfig.json`.
    pub async fn save_user_settings(&self, assets_dir: &Path) -> CinerateResult<PathBuf> {
        let settings = UserSettings {
            parser: &self.parser,
            api: &self.api,
        };
        let bytes = serde_json::to_vec_pretty(&settings)?;

        tokio::fs::create_dir_all(assets_dir).await?;
        let path = assets_dir.join(USER_CONFIG_FILE);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            Error::Other(format!("Failed to write settings to '{}': {e}", path.display()))
        })?;

        tracing::info!(target: "cinerate::config", path = %path.display(), "Saved user settings");
        Ok(path)
    }
}

// ================================================================================================
// Models
// ================================================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logs: LogsConfig,
    pub server: ServerConfig,
    pub parser: ParserConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Serialize)]
struct UserSettings<'a> {
    parser: &'a ParserConfig,
    api: &'a ApiConfig,
}

// ===============================================================================
// Logs
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    pub level: String,
}

// ===============================================================================
// Server
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// ===============================================================================
// Parser
// ===============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParserConfig {
    /// Tried in order; group 1 is the title, group 2 the year.
    pub name_expressions: Vec<String>,
    /// Group 1 is the title, used when no name expression matches.
    pub title_fallback_expression: String,
    /// Matches inside a title are replaced by a single space.
    pub title_cleanup_expression: String,
    /// Matched against the file extension, dot included (".mkv").
    pub extension_expression: String,
}

// ===============================================================================
// Movie API
// ===============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// "omdb", "tmdb"; anything else disables lookups.
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    /// Override of the provider endpoint (mirrors, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 10 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.provider, "omdb");
        assert_eq!(config.parser.name_expressions.len(), 2);
        assert_eq!(config.api.base_url, None);
    }

    #[test]
    fn user_config_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "api": { "provider": "tmdb", "api_key": "from-config" } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(USER_CONFIG_FILE),
            r#"{ "api": { "api_key": "from-user" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.api.provider, "tmdb");
        assert_eq!(config.api.api_key, "from-user");
        // untouched sections keep their defaults
        assert_eq!(config.logs.level, "info");
    }

    #[test]
    fn environment_overrides_every_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(USER_CONFIG_FILE),
            r#"{ "api": { "api_key": "from-user" } }"#,
        )
        .unwrap();

        let env = [
            ("CINERATE__API__API_KEY", "from-env"),
            ("CINERATE__SERVER__PORT", "9001"),
            ("OTHER__SERVER__PORT", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::load_with_env(dir.path(), Some(env)).unwrap();
        assert_eq!(config.api.api_key, "from-env");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.api.provider, "omdb");
    }

    #[tokio::test]
    async fn saved_settings_are_picked_up_on_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.api.api_key = "secret".to_string();
        config.parser.title_cleanup_expression = "[._-]+".to_string();

        let path = config.save_user_settings(dir.path()).await.unwrap();
        assert!(path.ends_with(USER_CONFIG_FILE));

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.api.api_key, "secret");
        assert_eq!(reloaded.parser, config.parser);
    }
}
