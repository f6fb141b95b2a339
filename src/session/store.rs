use crate::errors::ApiError;
use secrecy::{ExposeSecret, SecretString};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::debug;

/// Durable slot holding at most one opaque bearer token.
///
/// No structural validation of the token is done here; the API decides whether
/// it is still valid.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, or `None` when no session exists.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the backing storage cannot be read.
    fn get(&self) -> Result<Option<SecretString>, ApiError>;

    /// Replaces the stored token.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the token cannot be persisted.
    fn set(&self, token: &SecretString) -> Result<(), ApiError>;

    /// Removes the stored token. Clearing an empty store is a no-op.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), ApiError>;
}

/// Token persisted in a single file that survives process restarts.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn storage_error(action: &str, path: &Path, err: &io::Error) -> ApiError {
    ApiError::Storage(format!("Failed to {action} {}: {err}", path.display()))
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<SecretString>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_string())))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error("read", &self.path, &err)),
        }
    }

    fn set(&self, token: &SecretString) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| storage_error("create", parent, &err))?;
        }

        // Write then rename so a crash never leaves a truncated token behind.
        let temp = self.temp_path();
        write_private(&temp, token.expose_secret().as_bytes())
            .map_err(|err| storage_error("write", &temp, &err))?;
        fs::rename(&temp, &self.path).map_err(|err| storage_error("persist", &self.path, &err))?;

        debug!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error("remove", &self.path, &err)),
        }
    }
}

/// Writes `contents` to a freshly created file readable only by its owner.
///
/// A leftover file is removed first, since the create mode only applies to
/// new files.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// In-process store, used by tests and by embedders that manage persistence.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.to_string()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<SecretString>, ApiError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, token: &SecretString) -> Result<(), ApiError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
