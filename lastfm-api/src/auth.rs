//! Session management — persists the Last.fm session to disk.
//!
//! The session file is stored at `~/.config/lastfm/session.json`:
//!
//! ```json
//! { "name": "rj", "key": "d580d57f32848f5dcf574d1ce18d78b2", "subscriber": 0 }
//! ```
//!
//! The fields mirror the `session` object returned by `auth.getSession`. The
//! key does not expire unless the user revokes access for the application.

use crate::error::{LastfmError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// An authenticated user context. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    name: String,
    key: String,
    #[serde(default)]
    subscriber: u8,
}

impl Session {
    pub fn new(name: impl Into<String>, key: impl Into<String>, subscriber: u8) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            subscriber,
        }
    }

    /// Last.fm user name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session key (`sk`) used to sign calls.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw subscriber flag as sent by the service (`0` or `1`).
    pub fn subscriber(&self) -> u8 {
        self.subscriber
    }

    pub fn is_subscriber(&self) -> bool {
        self.subscriber != 0
    }

    /// Check whether a session key is present (does not validate it).
    pub fn is_logged_in(&self) -> bool {
        !self.key.is_empty()
    }

    /// Load the session from `~/.config/lastfm/session.json`.
    ///
    /// Returns `None` if the file does not exist.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::path()?)
    }

    /// Load a session from an explicit path.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Save the session to disk, creating parent directories if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Delete the session file from disk.
    pub fn clear() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Location of the session file.
    pub fn path() -> Result<PathBuf> {
        let config = dirs::config_dir()
            .ok_or_else(|| LastfmError::Other("cannot determine config directory".into()))?;
        Ok(config.join("lastfm").join("session.json"))
    }
}
