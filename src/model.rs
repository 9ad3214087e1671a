use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "dish-tui.yaml";
pub const DEFAULT_ENDPOINT: &str = "https://umzzcc503l.execute-api.us-west-2.amazonaws.com/dishes/";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_title")]
    pub title: String,
    // Where tracing output goes; a temp-dir file when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            title: default_title(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("dish-tui.log"))
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_title() -> String {
    "New dish".to_string()
}

/// Parse `dish-tui.yaml` inside `dir`. `Ok(None)` when the file does not exist.
pub fn load_config_from_dir(dir: &Path) -> Result<Option<AppConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&path).with_context(|| format!("reading {path:?}"))?;
    let cfg: AppConfig = serde_yaml::from_str(&s).with_context(|| format!("parsing {path:?}"))?;
    Ok(Some(cfg))
}

/// Discover the config: `DISH_TUI_CONFIG_DIR`, then CWD, then
/// `~/.config/dish-tui`. Defaults when none is found. `DISH_TUI_ENDPOINT`
/// overrides the endpoint.
pub fn load_config() -> Result<AppConfig> {
    let explicit = std::env::var("DISH_TUI_CONFIG_DIR").ok().map(PathBuf::from);
    let mut search: Vec<PathBuf> =
        vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))];
    if let Some(home) = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from)
    {
        search.push(home.join(".config").join("dish-tui"));
    }
    let endpoint = std::env::var("DISH_TUI_ENDPOINT").ok();
    discover_config(explicit.as_deref(), &search, endpoint.as_deref())
}

/// An explicit directory must hold the file; otherwise the first of `search`
/// that has one wins.
pub fn discover_config(
    explicit: Option<&Path>,
    search: &[PathBuf],
    endpoint_override: Option<&str>,
) -> Result<AppConfig> {
    let cfg = match explicit {
        Some(dir) => load_config_from_dir(dir)?
            .with_context(|| format!("{CONFIG_FILE} not found in {dir:?}"))?,
        None => {
            let mut found = None;
            for dir in search {
                if let Some(cfg) = load_config_from_dir(dir)? {
                    found = Some(cfg);
                    break;
                }
            }
            found.unwrap_or_default()
        }
    };
    Ok(apply_endpoint_override(cfg, endpoint_override))
}

fn apply_endpoint_override(mut cfg: AppConfig, endpoint: Option<&str>) -> AppConfig {
    if let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) {
        cfg.endpoint = endpoint.to_string();
    }
    cfg
}
