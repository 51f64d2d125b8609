use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

/// Snapshot of the authenticated user, as returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Owns the authenticated user's identity.
///
/// The request authenticator only ever reads or clears the user; creating
/// one is the login flow's job.
pub trait SessionController: Send + Sync {
    fn user(&self) -> Option<UserData>;
    fn set_user(&self, user: Option<UserData>);
}

/// In-memory session with optional JSON-file persistence.
pub struct Session {
    storage_dir: Option<PathBuf>,
    current: RwLock<Option<UserData>>,
}

impl Session {
    /// Create a purely in-memory session.
    pub fn new() -> Self {
        Self {
            storage_dir: None,
            current: RwLock::new(None),
        }
    }

    /// Create a session persisted under `storage_dir`, loading any
    /// previously saved user.
    pub fn with_storage(storage_dir: PathBuf) -> Self {
        let session = Self {
            storage_dir: Some(storage_dir),
            current: RwLock::new(None),
        };
        match session.load() {
            Ok(Some(user)) => {
                if let Ok(mut guard) = session.current.write() {
                    *guard = Some(user);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to load saved session"),
        }
        session
    }

    /// Default storage location under the user cache directory.
    pub fn default_storage_dir(app_name: &str) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(app_name))
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.storage_dir.as_ref().map(|dir| dir.join(SESSION_FILE))
    }

    fn load(&self) -> Result<Option<UserData>> {
        let Some(path) = self.session_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let user = serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(user))
    }

    fn save(&self, user: &UserData) -> Result<()> {
        let Some(path) = self.session_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(user)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if let Some(path) = self.session_path() {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController for Session {
    fn user(&self) -> Option<UserData> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    fn set_user(&self, user: Option<UserData>) {
        let result = match &user {
            Some(data) => self.save(data),
            None => self.remove(),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist session change");
        }
        if let Ok(mut guard) = self.current.write() {
            *guard = user;
        }
    }
}
