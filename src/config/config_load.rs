// src/config/config_load.rs
//
// loading config.toml

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::config_types::*;
use crate::error::Error;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathConfig,
    pub window: WindowConfig,
    pub rendering: RenderConfig,
    pub output: OutputConfig,
    pub scene: SceneConfig,
    pub signals: SignalConfig,
    pub style: StyleConfig,
}

impl Config {
    /// Loads `config.toml` from the executable's directory, then from the
    /// working directory. Falls back to the built-in scene when neither exists.
    pub fn load() -> Result<Self, Error> {
        let candidates = [
            Self::exe_dir().map(|dir| dir.join(CONFIG_FILE)),
            Some(PathBuf::from(CONFIG_FILE)),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                log::info!("Loading config from {}", path.display());
                return Self::load_from_path(&path);
            }
        }

        log::info!("No {} found, using built-in defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        // relative to the working directory
        PathBuf::from(&self.paths.output_directory)
    }

    pub fn resolve_video_path(&self) -> PathBuf {
        self.resolve_output_dir().join(&self.paths.video_file)
    }

    pub fn resolve_timeline_path(&self) -> PathBuf {
        self.resolve_output_dir().join(&self.paths.timeline_file)
    }

    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_reference_scene() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.scene.threshold, 5.0);
        assert_eq!(config.scene.high_altitude, 8.0);
        assert_eq!(config.scene.low_altitude, 2.0);
        assert_eq!(config.scene.probes, [[4.0, 0.0], [4.2, 0.0]]);
        assert_eq!(config.signals.samples, 100);
        assert_eq!(config.output.fps, 5);
        assert_eq!(config.paths.video_file, "drone_detection_system.mp4");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [scene]
            threshold = 6.5

            [output]
            fps = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.threshold, 6.5);
        assert_eq!(config.scene.frame_count, 100);
        assert_eq!(config.output.fps, 30);
        assert!(config.output.write_timeline);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let result = Config::from_toml("[scene]\nthreshold = \"high\"");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_output_paths() {
        let mut config = Config::default();
        config.paths.output_directory = "renders".to_string();
        assert_eq!(
            config.resolve_video_path(),
            PathBuf::from("renders").join("drone_detection_system.mp4")
        );
        assert_eq!(
            config.resolve_timeline_path(),
            PathBuf::from("renders").join("drone_detection_system.timeline.json")
        );
    }

    #[test]
    fn test_repository_config_matches_defaults() {
        let content = include_str!("../../config.toml");
        let config = Config::from_toml(content).unwrap();
        let defaults = Config::default();
        assert_eq!(config.scene.rubble, defaults.scene.rubble);
        assert_eq!(config.signals.ert_gain, defaults.signals.ert_gain);
        assert_eq!(config.window.width, defaults.window.width);
        assert_eq!(config.style.font_size, defaults.style.font_size);
    }
}
