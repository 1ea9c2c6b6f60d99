use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default dot diameter in pixels.
pub const DEFAULT_DOT_SIZE: f32 = 26.0;
/// Default number of dots in the chain.
pub const DEFAULT_DOT_COUNT: usize = 20;
/// Fraction of the chain that keeps following the pointer while idle.
pub const DEFAULT_SINE_FRACTION: f32 = 0.3;
/// Inactivity threshold before the trail starts wandering.
pub const DEFAULT_IDLE_TIMEOUT_MS: f64 = 150.0;
/// Per-frame gain toward the successor node.
pub const DEFAULT_DAMPING: f32 = 0.35;
/// Oscillator increment in radians per frame.
pub const DEFAULT_PHASE_SPEED: f32 = 0.05;

/// How per-frame motion relates to wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MotionTiming {
    /// One propagation step per frame regardless of frame duration.
    /// Perceived speed follows the display refresh rate.
    #[default]
    FrameLocked,
    /// Damping and phase speed are rescaled by the measured frame delta so
    /// the trail moves at the same speed it would at `reference_fps`.
    TimeScaled { reference_fps: f64 },
}

impl MotionTiming {
    /// Number of reference frames covered by `delta_ms`, clamped to [0, 4].
    ///
    /// Always 1.0 for `FrameLocked`.
    pub fn frame_factor(&self, delta_ms: f64) -> f32 {
        match *self {
            MotionTiming::FrameLocked => 1.0,
            MotionTiming::TimeScaled { reference_fps } => {
                if reference_fps <= 0.0 || !delta_ms.is_finite() {
                    return 1.0;
                }
                let reference_ms = 1000.0 / reference_fps;
                (delta_ms / reference_ms).clamp(0.0, 4.0) as f32
            }
        }
    }
}

/// Setup-time configuration for a trail.
///
/// Deserializes from JSON with every field optional; see
/// [`TrailConfig::from_json_str`]. Attribute-style string maps go through
/// [`TrailConfig::from_attributes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub dot_size: f32,
    pub dot_count: usize,
    /// `None` means `floor(dot_count * 0.3)`.
    pub sine_dots: Option<usize>,
    pub enabled: bool,
    pub idle_timeout_ms: f64,
    pub damping: f32,
    pub phase_speed: f32,
    /// Clamp idle oscillation to `size * 0.75 * scale`.
    pub clamp_oscillation: bool,
    pub motion: MotionTiming,
    /// The host is a touch device. The trail is built but never attaches.
    pub touch_device: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            dot_size: DEFAULT_DOT_SIZE,
            dot_count: DEFAULT_DOT_COUNT,
            sine_dots: None,
            enabled: false,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            damping: DEFAULT_DAMPING,
            phase_speed: DEFAULT_PHASE_SPEED,
            clamp_oscillation: true,
            motion: MotionTiming::FrameLocked,
            touch_device: false,
        }
    }
}

impl TrailConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TrailConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config from `data-*` style attributes.
    ///
    /// Recognised keys: `dot-size`, `dot-amount`, `sine-dots`, `enabled`,
    /// `idle-timeout`, `touch-device`. Missing, non-numeric, zero or
    /// out-of-range values fall back to the defaults. A negative dot amount
    /// is rejected. `enabled` and `touch-device` are switched on by the key
    /// being present at all, whatever its value.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = TrailConfig::default();

        for (key, value) in attributes {
            match key {
                "dot-size" => {
                    if let Some(size) = parse_nonzero(key, value) {
                        let size = size as f32;
                        if size > 0.0 && size.is_finite() {
                            config.dot_size = size;
                        } else {
                            log::warn!("ignoring out-of-range dot-size {value:?}");
                        }
                    }
                }
                "dot-amount" => {
                    if let Some(amount) = parse_nonzero(key, value) {
                        if amount < 0.0 {
                            return Err(ConfigError::InvalidDotCount(amount as i64));
                        }
                        // One dot is built per started unit, so "0.5" still yields one.
                        config.dot_count = amount.ceil() as usize;
                    }
                }
                "sine-dots" => {
                    if let Some(dots) = parse_nonzero(key, value) {
                        if dots > 0.0 {
                            config.sine_dots = Some(dots as usize);
                        } else {
                            log::warn!("ignoring negative sine-dots {value:?}");
                        }
                    }
                }
                "idle-timeout" => {
                    if let Some(timeout) = parse_nonzero(key, value) {
                        if timeout > 0.0 {
                            config.idle_timeout_ms = timeout;
                        } else {
                            log::warn!("ignoring negative idle-timeout {value:?}");
                        }
                    }
                }
                "enabled" => config.enabled = true,
                "touch-device" => config.touch_device = true,
                other => log::debug!("unknown trail attribute {other:?}"),
            }
        }

        Ok(config)
    }

    /// Reject configurations a chain cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dot_count == 0 {
            return Err(ConfigError::InvalidDotCount(0));
        }
        if !(self.dot_size.is_finite() && self.dot_size > 0.0) {
            return Err(ConfigError::InvalidDotSize(self.dot_size));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::InvalidDamping(self.damping));
        }
        if !(self.idle_timeout_ms.is_finite() && self.idle_timeout_ms >= 0.0) {
            return Err(ConfigError::InvalidIdleTimeout(self.idle_timeout_ms));
        }
        if !self.phase_speed.is_finite() {
            return Err(ConfigError::InvalidPhaseSpeed(self.phase_speed));
        }
        Ok(())
    }

    /// Resolved number of sine dots, clamped to the chain length.
    pub fn sine_dot_count(&self) -> usize {
        let requested = self
            .sine_dots
            .unwrap_or_else(|| (self.dot_count as f32 * DEFAULT_SINE_FRACTION).floor() as usize);
        if requested > self.dot_count {
            log::warn!(
                "sine dots {} exceed dot count {}, clamping",
                requested,
                self.dot_count
            );
            return self.dot_count;
        }
        requested
    }

    /// Visual scale of the dot at `index`: 1.0 for the head, tapering to
    /// `1 / dot_count` at the tail.
    pub fn scale_for(&self, index: usize) -> f32 {
        let step = 1.0 / self.dot_count as f32;
        1.0 - step * index as f32
    }
}

/// Parse a numeric attribute; `None` for non-numeric, non-finite or zero.
fn parse_nonzero(key: &str, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => Some(v),
        Ok(_) => {
            log::warn!("attribute {key}={value:?} is zero or not finite, using default");
            None
        }
        Err(_) => {
            log::warn!("attribute {key}={value:?} is not a number, using default");
            None
        }
    }
}
