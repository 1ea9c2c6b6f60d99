use ink_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("frame rate must be in (0, 1000] Hz, got {0}")]
    InvalidFrameRate(f64),

    #[error("failed to spawn frame thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("trail driver has stopped")]
    Stopped,
}
