use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "./tally.toml";
pub const DEFAULT_INDEX_PATH: &str = "hash.json";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub index_path: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// File the config was read from, `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            index_path: DEFAULT_INDEX_PATH.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
            source: None,
        }
    }
}

impl AppConfig {
    /// Reads `explicit`, else `TALLY_CONFIG`, else `./tally.toml`. A missing
    /// file yields defaults; env overrides apply either way.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("TALLY_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.resolve_paths(path.parent());
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.index_path = self.index_path.trim().to_string();
        self.log_level = self.log_level.trim().to_string();
        if self.log_level.is_empty() {
            self.log_level = "info".to_string();
        }
        if let Some(dir) = &self.log_dir {
            if dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.index_path = resolve_path(base, &self.index_path);
        if let Some(dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_path.is_empty() {
            return Err(anyhow!("index_path must not be empty"));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("TALLY_INDEX_PATH") {
            self.index_path = value;
        }
        if let Some(value) = lookup("TALLY_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("TALLY_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
