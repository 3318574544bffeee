// src/config/config_types.rs
//
// Config types for the app. Defaults reproduce the reference scene.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathConfig {
    pub output_directory: String,
    pub video_file: String,
    pub timeline_file: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            output_directory: ".".to_string(),
            video_file: "drone_detection_system.mp4".to_string(),
            timeline_file: "drone_detection_system.timeline.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub texture_width: u32,
    pub texture_height: u32,
    pub texture_samples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            texture_width: 1000,
            texture_height: 800,
            texture_samples: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub fps: u32,
    pub write_timeline: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fps: 5,
            write_timeline: true,
        }
    }
}

/************************* Scene Configs ********************/
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SceneConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub frame_count: usize,
    pub threshold: f64,    // frame value where the drone descends
    pub high_altitude: f64,
    pub low_altitude: f64,
    pub target: [f64; 2],
    pub rubble: Vec<[f64; 2]>,
    pub probes: [[f64; 2]; 2],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 10.0,
            frame_count: 100,
            threshold: 5.0,
            high_altitude: 8.0,
            low_altitude: 2.0,
            target: [4.0, 0.0],
            rubble: vec![[2.0, 0.0], [6.0, 0.0]],
            probes: [[4.0, 0.0], [4.2, 0.0]],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SignalConfig {
    pub samples: usize,
    pub emi_width: f64, // divisor of the squared distance
    pub emi_gain: f64,
    pub ert_width: f64,
    pub ert_gain: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            emi_width: 0.5,
            emi_gain: 1.0,
            ert_width: 0.2,
            ert_gain: 10.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StyleConfig {
    pub line_weight: f32,
    pub drone_size: f32,
    pub probe_size: f32,
    pub target_size: f32,
    pub rubble_size: f32,
    pub font_size: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_weight: 2.0,
            drone_size: 10.0,
            probe_size: 6.0,
            target_size: 12.0,
            rubble_size: 20.0,
            font_size: 14,
        }
    }
}
