// src/services/timeline.rs
//
// Sidecar JSON of every recorded frame state, written next to the video

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::animation::FrameState;
use crate::error::Result;

#[derive(Debug, Default, Serialize)]
pub struct Timeline {
    pub fps: u32,
    pub threshold: f64,
    pub frames: Vec<FrameState>,
}

impl Timeline {
    pub fn new(fps: u32, threshold: f64) -> Self {
        Self {
            fps,
            threshold,
            frames: Vec::new(),
        }
    }

    pub fn record(&mut self, state: &FrameState) {
        self.frames.push(state.clone());
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        log::info!("Wrote {} frame states to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;
    use crate::config::{SceneConfig, SignalConfig};
    use crate::models::{FrameSequence, SignalTables};

    fn recorded_timeline() -> Timeline {
        let scene = SceneConfig::default();
        let mut animator = Animator::new(&scene, SignalTables::new(&scene, &SignalConfig::default()));
        let mut timeline = Timeline::new(5, scene.threshold);
        for frame in FrameSequence::new(0.0, 10.0, 100).iter() {
            timeline.record(animator.update(frame));
        }
        timeline
    }

    #[test]
    fn test_records_every_frame() {
        let timeline = recorded_timeline();
        assert_eq!(timeline.len(), 100);
        assert_eq!(timeline.frames[0].frame, 0.0);
        assert_eq!(timeline.frames[99].frame, 10.0);
    }

    #[test]
    fn test_json_shape() {
        let timeline = recorded_timeline();
        let value: serde_json::Value = serde_json::from_str(&timeline.to_json().unwrap()).unwrap();
        assert_eq!(value["fps"], 5);
        assert_eq!(value["frames"][0]["phase"], "Searching");
        assert_eq!(value["frames"][0]["probes"][0]["xs"][0], serde_json::Value::Null);
        assert_eq!(value["frames"][99]["phase"], "Probing");
        assert_eq!(value["frames"][99]["probes"][1]["xs"][0], 4.2);
        assert_eq!(value["frames"][99]["emi"]["xs"].as_array().unwrap().len(), 100);
    }

    #[test]
    fn test_write_to_disk() {
        let dir = std::env::temp_dir().join(format!("rubblescan-timeline-{}", std::process::id()));
        let path = dir.join("timeline.json");
        recorded_timeline().write(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"threshold\": 5.0"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
