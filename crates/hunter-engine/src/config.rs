//! Engine configuration.
//!
//! Provides the runner's parameters: pacing, content location, the map to
//! load, the scripted input, and the nested gameplay tuning table.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use hunter_gameplay::config::GameplayConfig;
use hunter_gameplay::input::Key;

/// Configuration file name.
pub const CONFIG_FILE: &str = "hunter.toml";

/// A run of frames with the same keys held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputStep {
    /// Number of frames this step lasts
    pub frames: u32,
    /// Keys held during the step
    #[serde(default)]
    pub keys: Vec<Key>,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Loop Settings ===
    /// Target frames per second
    pub target_fps: u32,
    /// Largest delta time handed to the world, in seconds
    pub max_dt: f32,
    /// Measure real frame time and sleep out the budget; otherwise step by
    /// one nominal frame
    pub realtime: bool,
    /// Number of frames to run
    pub frames: u32,

    // === World Settings ===
    /// Content bundle (RON, or JSON by extension)
    pub content_path: PathBuf,
    /// Map to load from the bundle
    pub map: String,
    /// Player start key
    pub spawn: String,

    // === Input ===
    /// Scripted key presses, played in order, then idle
    pub input_script: Vec<InputStep>,

    // === Gameplay ===
    /// Gameplay tuning
    pub gameplay: GameplayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_dt: 0.1,
            realtime: false,
            frames: 600,

            content_path: PathBuf::from("assets/content.ron"),
            map: "world".to_string(),
            spawn: "house".to_string(),

            input_script: Vec::new(),

            gameplay: GameplayConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 240);
        self.max_dt = self.max_dt.clamp(0.001, 1.0);
        self.gameplay.validate();
    }

    /// Total frames covered by the input script.
    #[must_use]
    pub fn scripted_frames(&self) -> u32 {
        self.input_script.iter().map(|step| step.frames).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.max_dt, 0.1);
        assert!(!config.realtime);
        assert_eq!(config.gameplay.speed, 250.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.target_fps = 0;
        config.max_dt = 5.0;
        config.gameplay.speed = -3.0;

        config.validate();

        assert_eq!(config.target_fps, 1);
        assert_eq!(config.max_dt, 1.0);
        assert_eq!(config.gameplay.speed, 0.0);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = EngineConfig::default();
        config.frames = 42;
        config.spawn = "hospital".to_string();
        config.gameplay.interaction_radius = 150.0;
        config.input_script = vec![
            InputStep {
                frames: 10,
                keys: vec![Key::Right, Key::Up],
            },
            InputStep {
                frames: 1,
                keys: vec![Key::Interact],
            },
        ];

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.scripted_frames(), 11);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/hunter.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "frames = \"many\"").expect("Failed to write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.frames, 600);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            frames = 30

            [gameplay]
            notice_delay_ms = 250
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.frames, 30);
        assert_eq!(config.gameplay.notice_delay_ms, 250);
        assert_eq!(config.gameplay.look_around_ms, 1500);
        assert_eq!(config.map, "world");
    }
}
