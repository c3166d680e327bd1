//! Explicit session persistence. The token and minimal user object live in a
//! `session.json` under the configured data directory; everything that needs
//! the session receives a `SessionStore` instead of reaching for globals.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::Session;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("session.json"),
        }
    }

    /// Load the stored session, if any. Unreadable or corrupt files count as
    /// "not logged in" rather than an error.
    pub fn load(&self) -> Option<Session> {
        let data = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("discarding unreadable session file: {}", e);
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, data)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
