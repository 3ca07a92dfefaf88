use serde::Deserialize;

use crate::foods::search::DEFAULT_MATCH_THRESHOLD;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Minimum 0..=100 similarity for a food to match a catalog search.
    pub food_match_threshold: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let food_match_threshold = std::env::var("FOOD_MATCH_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MATCH_THRESHOLD);
        Ok(Self {
            database_url,
            food_match_threshold,
        })
    }
}
