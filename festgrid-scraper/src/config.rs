use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::Result;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeConfig {
    /// Grid pages to fetch, one per festival stretch.
    pub urls: Vec<String>,
    /// Four-digit year stamped onto extracted dates. The grid headers only
    /// carry month and day, and the parser never infers the year from page
    /// content.
    pub festival_year: u16,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
