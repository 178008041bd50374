use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::Path, path::PathBuf};

use crate::client::token::{TokenSource, usable};
use crate::error::ConfigError;

/// Persisted login state.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn save_to_file<P: AsRef<Path>>(session: &Session, path: P) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&path, json)?;
        log::info!("Session saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let session: Session = serde_json::from_str(&data)?;
        Ok(session)
    }
}

/// File-backed token storage. The file is re-read on every lookup.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means logged out.
    pub fn load(&self) -> Result<Session, ConfigError> {
        match Session::from_file(&self.path) {
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(Session::default()),
            other => other,
        }
    }

    pub fn save(&self, token: impl Into<String>, user: Option<String>) -> Result<Session, ConfigError> {
        let session = Session {
            token: Some(token.into()),
            user,
            saved_at: Some(Utc::now()),
        };
        Session::save_to_file(&session, &self.path)?;
        Ok(session)
    }

    pub fn clear(&self) -> Result<(), ConfigError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => usable(session.token),
            Err(e) => {
                log::warn!("Could not read session file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
