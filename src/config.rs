use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::filter::FilterCriteria;
use crate::order::OrderMode;

/// Environment variable consulted for the API key when no flag is given.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// User preferences persisted in `prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub api_key: Option<String>,
  pub theme_name: Option<String>,
  pub default_order: Option<OrderMode>,
  pub include_shorts: Option<bool>,
  pub min_duration_minutes: Option<f64>,
  pub keyword: Option<String>,
  /// Upper bound on uploads pages fetched per run. Unset means follow the server to the end.
  pub max_pages: Option<usize>,
  pub request_timeout_secs: Option<u64>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "ytmix") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        match toml::from_str(&content) {
          Ok(config) => return config,
          Err(e) => warn!(path = %config_file.display(), err = %e, "config: ignoring unreadable prefs"),
        }
      }
    }
    Self::default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "ytmix") {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }
}

/// Everything a pipeline run needs from the outside, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  /// May be empty; actions then fail with a missing-input error before any request.
  pub api_key: String,
  pub default_order: OrderMode,
  pub default_filters: FilterCriteria,
  pub max_pages: Option<usize>,
  pub request_timeout: Option<Duration>,
}

impl Settings {
  /// Merge sources. API key precedence: flag, then environment, then `prefs.toml`.
  pub fn resolve(config: &Config, flag_key: Option<String>, env_key: Option<String>) -> Self {
    let api_key = [flag_key, env_key, config.api_key.clone()]
      .into_iter()
      .flatten()
      .map(|k| k.trim().to_string())
      .find(|k| !k.is_empty())
      .unwrap_or_default();

    let default_filters = FilterCriteria::new(
      config.include_shorts.unwrap_or(true),
      config.min_duration_minutes,
      config.keyword.as_deref().unwrap_or(""),
    );

    Self {
      api_key,
      default_order: config.default_order.unwrap_or_default(),
      default_filters,
      max_pages: config.max_pages.filter(|&n| n > 0),
      request_timeout: config.request_timeout_secs.filter(|&s| s > 0).map(Duration::from_secs),
    }
  }
}
