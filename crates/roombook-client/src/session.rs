//! Persistence of the logged-in user between invocations.
//!
//! The stored record is trusted as-is: it is both the proof of login and the
//! profile cache. It is read once per command and removed on logout.

use roombook_core::User;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// File name used inside the platform data directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// JSON file holding the session principal
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured path, or the platform data directory
    #[must_use]
    pub fn from_config(path: Option<&Path>) -> Self {
        path.map_or_else(|| Self::new(default_session_path()), Self::new)
    }

    /// Location of the session file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored user.
    ///
    /// A missing file means nobody is logged in. A corrupt file is treated the
    /// same way so the user can simply log in again.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> ClientResult<Option<User>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ClientError::Session {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str::<User>(&contents) {
            Ok(user) => {
                debug!(user = %user.name, "session loaded");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    /// Persist `user` as the session principal
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, user: &User) -> ClientResult<()> {
        let io_err = |source: std::io::Error| ClientError::Session {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(user)?;
        std::fs::write(&self.path, json).map_err(io_err)?;

        info!(user = %user.name, role = ?user.role, "session saved");
        Ok(())
    }

    /// Forget the session. Clearing an absent session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ClientError::Session {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Gate for protected commands: the stored user, or `NotAuthenticated`
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when nobody is logged in.
    pub fn require_user(&self) -> ClientResult<User> {
        self.load()?.ok_or(ClientError::NotAuthenticated)
    }

    /// Gate for admin commands. A student session is sent back to login, the
    /// same as no session at all.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when nobody, or a non-admin, is logged in.
    pub fn require_admin(&self) -> ClientResult<User> {
        let user = self.require_user()?;
        if user.role.is_admin() {
            Ok(user)
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }
}

fn default_session_path() -> PathBuf {
    directories::ProjectDirs::from("id.ac", "campus", "roombook").map_or_else(
        || PathBuf::from(".roombook").join(SESSION_FILE_NAME),
        |dirs| dirs.data_dir().join(SESSION_FILE_NAME),
    )
}
