// Tue Jan 13 2026 - Alex

use crate::structure::{AbiTable, LayoutError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub abi: AbiTable,
    pub max_threads: usize,
    pub only_fixable: bool,
    pub show_layout: bool,
    pub json_output: bool,
    pub pretty_json: bool,
    pub enable_progress_bars: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abi: AbiTable::default(),
            max_threads: num_cpus::get(),
            only_fixable: false,
            show_layout: false,
            json_output: false,
            pretty_json: true,
            enable_progress_bars: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_abi(mut self, abi: AbiTable) -> Self {
        self.abi = abi;
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn with_only_fixable(mut self, only: bool) -> Self {
        self.only_fixable = only;
        self
    }

    pub fn with_layout(mut self, show: bool) -> Self {
        self.show_layout = show;
        self
    }

    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.max_threads == 0 {
            return Err(LayoutError::ValidationFailed("max_threads must be greater than 0".to_string()));
        }
        self.abi.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.abi.name, "amd64");
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = Config::new().with_max_threads(0);
        assert!(matches!(config.validate(), Err(LayoutError::ValidationFailed(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "only_fixable": true, "max_threads": 2 }"#).unwrap();
        assert!(config.only_fixable);
        assert_eq!(config.max_threads, 2);
        assert!(config.pretty_json);
    }
}
