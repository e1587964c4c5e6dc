//! Best score record
//!
//! A single record keyed by the game's storage key. Persisted to LocalStorage
//! on the web and to a versioned JSON file natively.

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use crate::persistence::PersistError;
use crate::sim::Character;

/// The best run so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
    /// Level reached on that run
    pub level: u32,
    pub character: Option<Character>,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl BestScore {
    /// Storage key for the record
    const STORAGE_KEY: &'static str = "pixel_dash_best_score";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `score` would replace the record
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.score
    }

    /// Replace the record if `score` beats it; returns whether it did
    pub fn record(&mut self, score: u64, level: u32, character: Character, timestamp: f64) -> bool {
        if !self.beaten_by(score) {
            return false;
        }
        *self = Self {
            score,
            level,
            character: Some(character),
            timestamp,
        };
        true
    }

    /// Load the record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match crate::persistence::decode::<BestScore>(&json) {
                    Ok(best) => {
                        log::info!("Loaded best score {}", best.score);
                        return best;
                    }
                    Err(e) => log::warn!("Discarding stored best score: {}", e),
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = crate::persistence::encode(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.score);
            }
        }
    }

    /// Default file location: `$XDG_CONFIG_HOME/pixel-dash` or `~/.config/pixel-dash`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> std::path::PathBuf {
        use std::path::PathBuf;

        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|xdg| !xdg.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(|h| PathBuf::from(h).join(".config"))
                    .unwrap_or_else(|_| PathBuf::from("."))
            });
        base.join("pixel-dash")
            .join(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Load the record from a file; a missing or unreadable file starts fresh
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match crate::persistence::read_file::<BestScore>(path) {
            Ok(best) => {
                log::info!("Loaded best score {} from {}", best.score, path.display());
                best
            }
            Err(PersistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No best score at {}, starting fresh", path.display());
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to load best score from {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Save the record to a file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), PersistError> {
        crate::persistence::write_file(path, self)?;
        log::info!("Best score saved ({}) to {}", self.score, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_when_beaten() {
        let mut best = BestScore::new();
        assert!(!best.record(0, 1, Character::Chick, 1.0));
        assert!(best.record(37, 4, Character::Dove, 2.0));
        assert_eq!(best.score, 37);
        assert_eq!(best.character, Some(Character::Dove));

        assert!(!best.record(37, 4, Character::Chick, 3.0));
        assert!(!best.record(12, 2, Character::Chick, 4.0));
        assert_eq!(best.timestamp, 2.0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("pixel-dash-best-{}", std::process::id()))
            .join("best.json");
        let mut best = BestScore::new();
        best.record(21, 3, Character::Kitten, 99.0);
        best.save_to(&path).unwrap();
        assert_eq!(BestScore::load_from(&path), best);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let path = std::env::temp_dir().join("pixel-dash-never-written/best.json");
        assert_eq!(BestScore::load_from(&path), BestScore::new());
    }

    #[test]
    fn test_default_path_uses_storage_key() {
        let path = BestScore::default_path();
        assert!(path.ends_with("pixel-dash/pixel_dash_best_score.json"));
    }
}
