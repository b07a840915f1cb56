//! Player configuration
//!
//! Loaded from RON (Rusty Object Notation) or JSON. Missing fields take their
//! defaults, so an empty file is a valid config.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for building a [`SoundPlayer`](crate::player::SoundPlayer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Start muted
    pub muted: bool,
    /// Directory clip assets are resolved against
    pub asset_dir: PathBuf,
    /// Clip played by `win_sound`
    pub win_clip: PathBuf,
    /// Clip looped by `spin_sound`
    pub spin_clip: PathBuf,
    /// Synth output rate in Hz
    pub sample_rate: u32,
    /// How often a looping clip is checked for its end, in milliseconds
    pub clip_poll_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            muted: false,
            asset_dir: PathBuf::from("."),
            win_clip: PathBuf::from("winner.mp3"),
            spin_clip: PathBuf::from("spin.mp3"),
            sample_rate: 44_100,
            clip_poll_ms: 10,
        }
    }
}

impl PlayerConfig {
    /// Set the initial mute state
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Set the asset directory
    #[must_use]
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Set the win and spin clip assets
    #[must_use]
    pub fn with_clips(mut self, win: impl Into<PathBuf>, spin: impl Into<PathBuf>) -> Self {
        self.win_clip = win.into();
        self.spin_clip = spin.into();
        self
    }

    /// Set the synth sample rate
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the clip poll interval
    #[must_use]
    pub fn with_clip_poll_ms(mut self, ms: u64) -> Self {
        self.clip_poll_ms = ms;
        self
    }

    /// Clip poll interval, never shorter than a millisecond
    #[must_use]
    pub fn clip_poll_interval(&self) -> Duration {
        Duration::from_millis(self.clip_poll_ms.max(1))
    }

    /// Load from a `.ron` or `.json` file, chosen by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// extension is neither
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::load_ron(path),
            Some("json") => Self::load_json(path),
            _ => Err(ConfigError::UnknownFormat(path.display().to_string())),
        }
    }

    /// Load from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron(&content)
    }

    /// Parse RON text
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur while loading or saving a config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// File extension is not a known format
    UnknownFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::UnknownFormat(path) => write!(f, "Unknown config format: {path}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sfx-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_empty_ron_uses_defaults() {
        let config = PlayerConfig::from_ron("()").unwrap();
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.win_clip, PathBuf::from("winner.mp3"));
        assert_eq!(config.spin_clip, PathBuf::from("spin.mp3"));
    }

    #[test]
    fn test_partial_ron() {
        let config = PlayerConfig::from_ron("(muted: true, asset_dir: \"assets/audio\")").unwrap();
        assert!(config.muted);
        assert_eq!(config.asset_dir, PathBuf::from("assets/audio"));
        assert_eq!(config.sample_rate, 44_100);
    }

    #[test]
    fn test_bad_ron_is_reported() {
        let err = PlayerConfig::from_ron("(muted: maybe)").unwrap_err();
        assert!(matches!(err, ConfigError::DeserializeError(_)));
    }

    #[test]
    fn test_save_and_load_files() {
        let config = PlayerConfig::default()
            .with_muted(true)
            .with_clips("w.ogg", "s.ogg")
            .with_sample_rate(22_050);

        let ron_path = temp_path("config.ron");
        config.save_ron(&ron_path).unwrap();
        assert_eq!(PlayerConfig::load(&ron_path).unwrap(), config);
        let _ = fs::remove_file(&ron_path);

        let json_path = temp_path("config.json");
        config.save_json(&json_path).unwrap();
        assert_eq!(PlayerConfig::load(&json_path).unwrap(), config);
        let _ = fs::remove_file(&json_path);
    }

    #[test]
    fn test_unknown_extension() {
        let err = PlayerConfig::load("sfx.toml").unwrap_err();
        assert_eq!(err, ConfigError::UnknownFormat("sfx.toml".into()));
    }

    #[test]
    fn test_poll_interval_floor() {
        let config = PlayerConfig::default().with_clip_poll_ms(0);
        assert_eq!(config.clip_poll_interval(), Duration::from_millis(1));
    }
}
