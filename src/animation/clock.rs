// src/animation/clock.rs
//
// Paces window playback at the recording frame rate

#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_timer: f32,
    frame_duration: f32,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_timer: 0.0,
            frame_duration: 1.0 / fps.max(1) as f32,
        }
    }

    /// Accumulates `dt` seconds; true when the next frame is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.frame_timer += dt;
        if self.frame_timer >= self.frame_duration {
            self.frame_timer -= self.frame_duration;
            // never queue up more than one pending frame
            self.frame_timer = self.frame_timer.min(self.frame_duration);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.frame_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_at_five_fps() {
        let mut clock = FrameClock::new(5);
        assert!(!clock.tick(0.1));
        assert!(clock.tick(0.1));
        assert!(!clock.tick(0.05));
    }

    #[test]
    fn test_long_stall_yields_single_frame() {
        let mut clock = FrameClock::new(5);
        assert!(clock.tick(3.0));
        assert!(clock.tick(0.0));
        assert!(!clock.tick(0.0));
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_duration, 1.0);
    }
}
