pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod math;
pub mod traits;

pub use config::Config;
pub use core::{CoreEvent, FrameLoop, FrameOutput, HostCommand};
pub use error::CoreError;
