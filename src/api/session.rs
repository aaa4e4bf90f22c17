//! Saved login session
//!
//! `ayika login` and the console's sign-in write the session cookies to
//! `<data_dir>/session.json`; every later run loads them into its client.

use super::client::ApiClient;
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SavedSession {
    /// Cookies only apply to the API they were issued by
    api_url: String,
    cookies: String,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved cookies into `client`. Returns false when nothing was
    /// saved, or the session belongs to another API URL.
    pub fn restore(&self, client: &ApiClient) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let saved: SavedSession = serde_json::from_str(&content)
            .with_context(|| format!("Invalid session file {}", self.path.display()))?;

        if saved.api_url != client.base_url() {
            debug!(
                saved = %saved.api_url,
                current = %client.base_url(),
                "Session is for another API"
            );
            return Ok(false);
        }
        client.restore_session_cookies(&saved.cookies);
        debug!(saved_at = %saved.saved_at, "Session restored");
        Ok(true)
    }

    /// Write the client's cookies, readable by the current user only
    pub fn save(&self, client: &ApiClient) -> Result<()> {
        let saved = SavedSession {
            api_url: client.base_url().to_string(),
            cookies: client.session_cookies().unwrap_or_default(),
            saved_at: Utc::now(),
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(&saved)?;
        write_private(&self.path, content.as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Forget the saved session. Returns false when none was saved.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies to new files
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

/// Client for the configured API carrying the saved session, if any. An
/// unreadable session file is logged and ignored.
pub fn connect(config: &Config) -> Result<ApiClient> {
    let client = ApiClient::new(&config.api_url, config.timeout())?;
    let store = SessionStore::new(config.session_file());
    if let Err(err) = store.restore(&client) {
        warn!(error = %err, "Ignoring saved session");
    }
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(url, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_save_then_restore() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        let first = client("http://127.0.0.1:8000/api/v1");
        first.restore_session_cookies("sessionid=abc; csrftoken=tok");
        store.save(&first).unwrap();

        let second = client("http://127.0.0.1:8000/api/v1");
        assert!(store.restore(&second).unwrap());
        let cookies = second.session_cookies().unwrap();
        assert!(cookies.contains("sessionid=abc"));
        assert!(cookies.contains("csrftoken=tok"));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&client("http://127.0.0.1:8000/api/v1")).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_session_for_other_api_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let first = client("http://127.0.0.1:8000/api/v1");
        first.restore_session_cookies("sessionid=abc");
        store.save(&first).unwrap();

        let other = client("http://127.0.0.1:9000/api/v1");
        assert!(!store.restore(&other).unwrap());
        assert_eq!(other.session_cookies(), None);
    }

    #[test]
    fn test_clear_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(!store.restore(&client("http://127.0.0.1:8000/api/v1")).unwrap());
        assert!(!store.clear().unwrap());

        store.save(&client("http://127.0.0.1:8000/api/v1")).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SessionStore::new(path)
            .restore(&client("http://127.0.0.1:8000/api/v1"))
            .is_err());
    }
}
