use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Largest page the backend serves
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (logs live under `logs/`, the saved session in `session.json`)
    pub data_dir: PathBuf,

    /// Root of the REST API, e.g. `http://localhost:8000/api/v1`
    pub api_url: String,

    /// Rows per page in tables and list commands
    pub page_size: u32,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// How long a resolved dialog stays on screen before it is removed
    pub exit_transition_ms: u64,

    /// Default auto-hide delay of notifications, 0 keeps them until closed
    pub notification_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .map(|dir| dir.join("ayika"))
                .unwrap_or_else(|| PathBuf::from("./data")),
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 25,
            timeout_secs: 30,
            exit_transition_ms: 150,
            notification_ms: 6000,
        }
    }
}

/// Contents of an `ayika.json` file; every key is optional
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub api_url: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub exit_transition_ms: Option<u64>,
    pub notification_ms: Option<u64>,
}

impl Config {
    /// Defaults, then the first configuration file found, then `AYIKA_*`
    /// environment variables
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        if let Some(file_config) = Self::load_from_paths(&Self::config_paths()).await? {
            config.merge_with(file_config);
        }

        config.apply_env(|key| std::env::var(key).ok())?;

        if !config.data_dir.exists() {
            std::fs::create_dir_all(&config.data_dir).with_context(|| {
                format!("Failed to create data directory {}", config.data_dir.display())
            })?;
        }

        Ok(config)
    }

    /// Candidate configuration files in priority order:
    /// `./.ayika.json`, `./ayika.json`, `$CONFIG_DIR/ayika/ayika.json`
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./.ayika.json"), PathBuf::from("./ayika.json")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ayika").join("ayika.json"));
        }
        paths
    }

    /// Load the first existing file of `paths`
    pub async fn load_from_paths(paths: &[PathBuf]) -> Result<Option<FileConfig>> {
        for path in paths {
            if path.exists() {
                debug!("Loading configuration from: {}", path.display());
                return Self::load_file(path).await.map(Some);
            }
        }
        Ok(None)
    }

    async fn load_file(path: &Path) -> Result<FileConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn merge_with(&mut self, other: FileConfig) {
        if let Some(data_dir) = other.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(api_url) = other.api_url {
            self.api_url = api_url;
        }
        if let Some(page_size) = other.page_size {
            self.page_size = page_size;
        }
        if let Some(timeout_secs) = other.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(exit_transition_ms) = other.exit_transition_ms {
            self.exit_transition_ms = exit_transition_ms;
        }
        if let Some(notification_ms) = other.notification_ms {
            self.notification_ms = notification_ms;
        }
    }

    /// Apply `AYIKA_*` variables read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("AYIKA_API_URL") {
            self.api_url = url;
        }
        if let Some(data_dir) = lookup("AYIKA_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(value) = lookup("AYIKA_PAGE_SIZE") {
            self.page_size = parse_env("AYIKA_PAGE_SIZE", &value)?;
        }
        if let Some(value) = lookup("AYIKA_TIMEOUT_SECS") {
            self.timeout_secs = parse_env("AYIKA_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("AYIKA_EXIT_TRANSITION_MS") {
            self.exit_transition_ms = parse_env("AYIKA_EXIT_TRANSITION_MS", &value)?;
        }
        if let Some(value) = lookup("AYIKA_NOTIFICATION_MS") {
            self.notification_ms = parse_env("AYIKA_NOTIFICATION_MS", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("api_url '{}' is not a valid URL", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!("api_url must use http or https"));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(anyhow::anyhow!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!("timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn exit_transition(&self) -> Duration {
        Duration::from_millis(self.exit_transition_ms)
    }

    /// `None` when notifications stay until closed
    pub fn notification_auto_hide(&self) -> Option<Duration> {
        (self.notification_ms > 0).then(|| Duration::from_millis(self.notification_ms))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir().join("ayika.log")
    }

    /// Saved login session of `ayika login` and the console
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, value, e))
}
