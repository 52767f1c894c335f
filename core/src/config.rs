use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::model::GOOD_RATING;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Books returned per ranking call.
    pub batch_size: usize,
    /// Ratings at or above this mark a user as liking a book.
    pub good_rating: f64,
    /// Weight of the catalog prior in the Bayesian rating.
    pub prior_weight: f64,
    /// Books with fewer connected raters score zero under the Bayesian rating.
    pub min_connections: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            good_rating: GOOD_RATING,
            prior_weight: 3.0,
            min_connections: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub users_read_dir: String,
    pub books_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            users_read_dir: "users_read".into(),
            books_dir: "books".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub recommendation: RecommendationConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Layers `default`, then `$RUN_MODE`, then `SHELFWISE__*` env vars.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&run_mode).to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("SHELFWISE").separator("__"));

        builder.build()?.try_deserialize()
    }
}
