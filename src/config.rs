// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::overlay::OverlayTemplates;
use anyhow::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FLASH_DELAY_MS: u64 = 8000;

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_user_agent() -> String {
    format!("worddb/{}", env!("CARGO_PKG_VERSION"))
}
fn default_flash_delay() -> u64 {
    DEFAULT_FLASH_DELAY_MS
}
fn default_error_background() -> String {
    "#F60018".to_string()
}
fn default_lookup_template() -> String {
    "http://www.wordreference.com/enpt/{word}".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Token the server expects in `csrfmiddlewaretoken`.
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_flash_delay")]
    pub flash_delay_ms: u64,
    #[serde(default = "default_error_background")]
    pub error_background: String,
    /// `{word}` is replaced by the URL-encoded field value.
    #[serde(default = "default_lookup_template")]
    pub lookup_url_template: String,

    /// 0 disables the timeout.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub templates: OverlayTemplates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            csrf_token: String::new(),
            user_agent: default_user_agent(),
            flash_delay_ms: DEFAULT_FLASH_DELAY_MS,
            error_background: default_error_background(),
            lookup_url_template: default_lookup_template(),
            request_timeout_secs: 30,
            log_level: default_log_level(),
            templates: OverlayTemplates::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers (onboarding) can behave accordingly.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Whether `err` means the config file does not exist, as opposed to being
    /// unreadable or malformed.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            atomic_write(&path, toml_str)?;
            Ok(())
        })
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn flash_delay(&self) -> Duration {
        Duration::from_millis(self.flash_delay_ms)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        log::LevelFilter::from_str(&self.log_level).unwrap_or(log::LevelFilter::Info)
    }
}

fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let lock_path = file_path.with_extension("lock");
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;

    file.lock_exclusive()?;
    let result = f();
    file.unlock()?;
    result
}

/// Write to a `.tmp` sibling, then rename over the target.
fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
