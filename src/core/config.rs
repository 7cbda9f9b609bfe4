//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default base URL of the Mollie REST API
pub const DEFAULT_API_URL: &str = "https://api.mollie.com/v2";

/// mollie-cli configuration with layered hierarchy
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// API key or access token used when none is given on the command line
    pub api_key: Option<String>,

    /// Send `testmode=true` with access tokens
    pub testmode: Option<bool>,

    /// Default output format (table, md, csv, json, yaml, id)
    pub default_format: Option<String>,

    /// API base URL, mostly useful for pointing at a stub server
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Config file (MOLLIE_CONFIG, or ~/.config/mollie-cli/config.yaml)
        let path = std::env::var_os("MOLLIE_CONFIG")
            .map(PathBuf::from)
            .or_else(Self::global_config_path);
        if let Some(path) = path {
            if let Some(file) = Self::load_file(&path) {
                config.merge(file);
            }
        }

        // 3. Environment variables are applied by clap (`env = ...`) on the
        //    matching flags, which take precedence over everything here.

        config
    }

    /// Read one config file, logging and skipping anything unusable
    pub fn load_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return None;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("ignoring config file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                log::debug!("loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("ignoring config file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mollie-cli")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.testmode.is_some() {
            self.testmode = other.testmode;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
    }

    /// API base URL without a trailing slash
    pub fn api_url(&self) -> String {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }
}
