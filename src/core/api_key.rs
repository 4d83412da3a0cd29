//! API key storage: load and persist the Gemini API key in the config directory.
//!
//! The key is stored in a dedicated file with restrictive permissions (0o600 on Unix).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

use crate::core::paths;

/// Errors when loading or storing the API key.
#[derive(Debug, thiserror::Error)]
pub enum ApiKeyError {
    #[error("No config directory available")]
    NoConfigDir,
    #[error("API key is empty")]
    Empty,
    #[error("Failed to store API key: {0}")]
    Io(#[from] io::Error),
}

/// Path to the API key file in the config directory.
pub fn credentials_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join("api-key"))
}

/// Load the API key from the config directory.
/// Returns `None` if the file is absent, empty, or unreadable.
pub fn load_api_key() -> Option<String> {
    load_api_key_from(&credentials_path()?)
}

pub(crate) fn load_api_key_from(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let key = content.trim().to_string();
    if key.is_empty() { None } else { Some(key) }
}

/// Store the API key in the config directory.
/// Creates the config dir if needed. On Unix, sets file permissions to 0o600.
pub fn store_api_key(key: &str) -> Result<PathBuf, ApiKeyError> {
    let path = credentials_path().ok_or(ApiKeyError::NoConfigDir)?;
    store_api_key_at(&path, key)?;
    Ok(path)
}

pub(crate) fn store_api_key_at(path: &Path, key: &str) -> Result<(), ApiKeyError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(ApiKeyError::Empty);
    }
    let dir = path.parent().ok_or_else(|| {
        ApiKeyError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid credentials path",
        ))
    })?;
    fs::create_dir_all(dir)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    // A new file is owner-only from the start.
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path)?;

    // An existing file keeps its old mode on open; tighten it before writing.
    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))?;

    file.write_all(trimmed.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api-key");

        store_api_key_at(&path, "  AIza-test-key-123 \n").unwrap();
        assert_eq!(
            load_api_key_from(&path).as_deref(),
            Some("AIza-test-key-123")
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-key");
        let err = store_api_key_at(&path, "   ").unwrap_err();
        assert!(matches!(err, ApiKeyError::Empty));
        assert!(!path.exists());
    }

    #[test]
    fn blank_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-key");
        fs::write(&path, "\n\n").unwrap();
        assert_eq!(load_api_key_from(&path), None);
    }

    #[cfg(unix)]
    #[test]
    fn stored_key_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-key");
        store_api_key_at(&path, "k").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn overwriting_a_world_readable_file_tightens_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-key");
        fs::write(&path, "old-key\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        store_api_key_at(&path, "new-key").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(load_api_key_from(&path).as_deref(), Some("new-key"));
    }
}
