// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::core::MAX_FRAME_DELTA;

#[derive(Parser, Debug, Clone)]
#[command(name = "gratitude-grove")]
#[command(about = "First-person grove of gratitude notes", long_about = None)]
pub struct Cli {
    /// JSON config file; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON array of object descriptors to populate the grove
    #[arg(long)]
    pub objects: Option<PathBuf>,

    /// Run without a window, printing events as JSON lines
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Fixed frame step in seconds for headless mode
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Start without a logged-in session (capture is never requested)
    #[arg(long, default_value = "false")]
    pub guest: bool,

    /// Only print the final summary in headless mode
    #[arg(long, short, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// `--dt` must be a step the fixed clock can take without clamping
    pub fn validate_headless(&self) -> Result<()> {
        anyhow::ensure!(
            self.dt.is_finite() && self.dt > 0.0 && self.dt <= MAX_FRAME_DELTA,
            "--dt must be within (0, {}] seconds, got {}",
            MAX_FRAME_DELTA,
            self.dt
        );
        Ok(())
    }
}
