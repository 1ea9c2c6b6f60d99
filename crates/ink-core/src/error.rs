use thiserror::Error;

/// Configuration problems that prevent a trail from being built.
///
/// Soft problems (missing or unparseable attributes, zero values) never
/// surface here; they fall back to defaults with a warning instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dot count must be at least 1, got {0}")]
    InvalidDotCount(i64),

    #[error("dot size must be a positive finite number, got {0}")]
    InvalidDotSize(f32),

    #[error("damping must be in (0, 1], got {0}")]
    InvalidDamping(f32),

    #[error("idle timeout must be a non-negative finite number of ms, got {0}")]
    InvalidIdleTimeout(f64),

    #[error("phase speed must be finite, got {0}")]
    InvalidPhaseSpeed(f32),

    #[error("malformed trail config: {0}")]
    Json(#[from] serde_json::Error),
}
