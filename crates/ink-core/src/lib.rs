pub mod chain;
pub mod config;
pub mod error;
pub mod idle;
pub mod node;
pub mod oscillator;
pub mod render;

pub use chain::{TrailChain, INITIAL_TARGET};
pub use config::{MotionTiming, TrailConfig};
pub use error::ConfigError;
pub use idle::IdleTimer;
pub use node::{NodeTransform, TrailNode};
pub use oscillator::WanderPhase;
pub use render::{NullRenderer, RecordingRenderer, RenderCommand, TrailRenderer};

pub use glam::Vec2;
