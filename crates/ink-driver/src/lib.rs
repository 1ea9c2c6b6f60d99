pub mod channel_renderer;
pub mod config;
pub mod driver;
pub mod error;

pub use channel_renderer::ChannelRenderer;
pub use config::DriverConfig;
pub use driver::{ChainSnapshot, TrailDriver, TrailHandle};
pub use error::DriverError;
