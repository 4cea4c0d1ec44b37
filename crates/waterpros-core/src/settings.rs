use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::routes::BuildMode;
use crate::SettingsError;

pub const SETTINGS_FILE: &str = "waterpros.json";

pub const ENV_CATALOG_PATH: &str = "WATERPROS_CATALOG_PATH";
pub const ENV_LOCAL_DATA_PATH: &str = "WATERPROS_LOCAL_DATA_PATH";
pub const ENV_BASE_URL: &str = "WATERPROS_BASE_URL";
pub const ENV_FAST_ITERATION: &str = "WATERPROS_FAST_ITERATION";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteSettings {
    pub catalog_path: PathBuf,
    pub local_data_path: PathBuf,
    pub base_url: String,
    /// Skip route enumeration entirely (local development builds).
    pub fast_iteration: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/services.json"),
            local_data_path: PathBuf::from("data/local_data.json"),
            base_url: "https://emergencywaterpros.com".to_string(),
            fast_iteration: false,
        }
    }
}

impl SiteSettings {
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Settings file if present and valid, defaults otherwise, then the
    /// process environment on top.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
        let mut settings = if path.exists() {
            Self::from_file(path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring settings file, using defaults");
                Self::default()
            })
        } else {
            Self::default()
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_CATALOG_PATH).filter(|v| !v.is_empty()) {
            self.catalog_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_LOCAL_DATA_PATH).filter(|v| !v.is_empty()) {
            self.local_data_path = PathBuf::from(path);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(flag) = lookup(ENV_FAST_ITERATION) {
            self.fast_iteration = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn build_mode(&self) -> BuildMode {
        BuildMode::from_fast_flag(self.fast_iteration)
    }
}
