use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpOptions;

/// Drive v2 API root. v2 is the version that exposes `title` and `downloadUrl`.
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v2";

/// Full Drive scope requested for the service account.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Global configuration loaded from `~/.config/gdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GdlConfig {
    /// Base URL of the Drive v2 API (no trailing slash).
    pub drive_api_base: String,
    /// OAuth scope placed in the service account assertion.
    pub scope: String,
    /// Token endpoint override; if missing, the key file's `token_uri` is used.
    pub token_uri: Option<String>,
    /// Optional `maxResults` per listing page (None = API default).
    pub page_size: Option<u32>,
    /// Connect timeout in seconds for every request.
    pub connect_timeout_secs: u64,
    /// Overall timeout in seconds for a single request or download.
    pub timeout_secs: u64,
}

impl Default for GdlConfig {
    fn default() -> Self {
        Self {
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            token_uri: None,
            page_size: None,
            connect_timeout_secs: 30,
            timeout_secs: 3600,
        }
    }
}

impl GdlConfig {
    /// curl timeouts derived from this config.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// API base with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.drive_api_base.trim_end_matches('/')
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from(path: &Path) -> Result<GdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: GdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
