use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, SiteError};

pub const DEFAULT_CONFIG_PATH: &str = "gazette.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_name: String,
    pub bind: String,
    pub port: u16,
    /// JSON content fixture the in-memory store is seeded from.
    pub fixture: PathBuf,
    pub log_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Domain the search box restricts results to.
    pub search_domain: String,
    /// Serve the site as if it were this day. Useful with an old fixture.
    pub frozen_date: Option<NaiveDate>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "The Gazette".to_string(),
            bind: "127.0.0.1".to_string(),
            port: 3000,
            fixture: PathBuf::from("data/fixture.json"),
            log_dir: PathBuf::from("logs"),
            static_dir: PathBuf::from("static"),
            search_domain: "gazette.example.edu".to_string(),
            frozen_date: None,
        }
    }
}

impl SiteConfig {
    /// Load `path`, falling back to defaults when the default config file
    /// is absent, then apply `GAZETTE_*` environment overrides. An explicitly
    /// named file that can't be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SiteError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: SiteConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Environment overrides. Values that don't parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("GAZETTE_BIND") {
            self.bind = bind;
        }
        if let Some(port) = lookup("GAZETTE_PORT") {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring malformed GAZETTE_PORT '{}'", port),
            }
        }
        if let Some(fixture) = lookup("GAZETTE_FIXTURE") {
            self.fixture = PathBuf::from(fixture);
        }
        if let Some(dir) = lookup("GAZETTE_LOG_DIR") {
            self.log_dir = PathBuf::from(dir);
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
