//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp → save, old save → backup)
//! - Corruption detection and recovery from the backup

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current envelope format version
pub const FORMAT_VERSION: u32 = 1;

/// Errors at the storage edge
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Versioned wrapper around a saved value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub payload: T,
}

/// Wrap a value in the current envelope and serialize it
pub fn encode<T: Serialize>(value: &T) -> Result<String, PersistError> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        payload: value,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse an envelope, rejecting versions this build does not understand
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T, PersistError> {
    let envelope: Envelope<T> = serde_json::from_str(json)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(envelope.payload)
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::{Path, PathBuf};

    use serde::Serialize;
    use serde::de::DeserializeOwned;

    use super::{PersistError, decode, encode};

    fn sibling(path: &Path, ext: &str) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(ext);
        path.with_file_name(name)
    }

    /// Backup location for a save file
    pub fn backup_path(path: &Path) -> PathBuf {
        sibling(path, ".bak")
    }

    /// Write through a temp file, keeping the previous save as a backup
    pub fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = sibling(path, ".tmp");
        fs::write(&tmp, encode(value)?)?;
        if path.exists() {
            fs::rename(path, backup_path(path))?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Read a save, falling back to the backup if the primary is unusable
    pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
        let primary = fs::read_to_string(path)
            .map_err(PersistError::from)
            .and_then(|json| decode(&json));
        match primary {
            Ok(value) => Ok(value),
            Err(err) => {
                let backup = backup_path(path);
                if !backup.exists() {
                    return Err(err);
                }
                log::warn!(
                    "Save {} unusable ({}), trying backup",
                    path.display(),
                    err
                );
                decode(&fs::read_to_string(backup)?)
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::{backup_path, read_file, write_file};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pixel-dash-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let json = r#"{ "version": 99, "payload": 5 }"#;
        assert!(matches!(
            decode::<u64>(json),
            Err(PersistError::UnsupportedVersion {
                found: 99,
                expected: FORMAT_VERSION
            })
        ));
    }

    #[test]
    fn test_encode_wraps_payload() {
        let json = encode(&42u64).unwrap();
        assert_eq!(decode::<u64>(&json).unwrap(), 42);
        assert!(json.contains("\"version\":1"));
    }

    #[test]
    fn test_write_rotates_backup() {
        let dir = scratch_dir("rotate");
        let path = dir.join("save.json");
        write_file(&path, &1u64).unwrap();
        write_file(&path, &2u64).unwrap();
        assert_eq!(read_file::<u64>(&path).unwrap(), 2);
        assert_eq!(read_file::<u64>(&backup_path(&path)).unwrap(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_save_recovers_from_backup() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("save.json");
        write_file(&path, &7u64).unwrap();
        write_file(&path, &8u64).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_file::<u64>(&path).unwrap(), 7);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_save_is_io_error() {
        let dir = scratch_dir("missing");
        assert!(matches!(
            read_file::<u64>(&dir.join("nope.json")),
            Err(PersistError::Io(_))
        ));
    }
}
