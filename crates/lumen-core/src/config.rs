//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use lumen_navigation::DEFAULT_SEARCH_TEMPLATE;
use lumen_session::StoreOptions;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address opened by `open_home_tab`
    pub homepage: String,
    /// Search engine URL template, `%s` is replaced with the query
    pub search_engine: String,
    /// Title a tab shows before its first load completes
    pub new_tab_title: String,
    /// Closed tabs kept for restore
    pub closed_tab_limit: usize,
    /// Session events buffered per subscriber
    pub event_capacity: usize,
}

impl Config {
    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;

        tracing::info!(path = %path.display(), "Loaded config");

        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.search_engine.contains("%s") {
            return Err(CoreError::Config(format!(
                "search_engine template has no %s placeholder: {}",
                self.search_engine
            )));
        }

        if self.event_capacity == 0 {
            return Err(CoreError::Config(
                "event_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            placeholder_title: self.new_tab_title.clone(),
            closed_tab_limit: self.closed_tab_limit,
            event_capacity: self.event_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let store = StoreOptions::default();

        Self {
            homepage: "about:blank".to_string(),
            search_engine: DEFAULT_SEARCH_TEMPLATE.to_string(),
            new_tab_title: store.placeholder_title,
            closed_tab_limit: store.closed_tab_limit,
            event_capacity: store.event_capacity,
        }
    }
}
