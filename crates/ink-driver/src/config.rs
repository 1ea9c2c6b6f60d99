use std::time::Duration;

use crate::error::DriverError;

/// Frame loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Frames per second the trail is advanced at.
    pub frame_rate: f64,
    /// Name of the frame thread.
    pub thread_name: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            thread_name: "ink-cursor-frames".to_string(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), DriverError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0 && self.frame_rate <= 1000.0) {
            return Err(DriverError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate)
    }
}
