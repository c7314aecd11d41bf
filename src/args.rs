use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera Index (default 0)
    #[arg(short, long, default_value_t = 0)]
    pub cam_index: u32,

    /// Configuration file (created with defaults if missing)
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Mirror the camera image before landmark extraction
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// Use the synthetic face instead of the ONNX face mesh
    #[arg(long)]
    pub simulate: bool,

    /// Replay recorded landmark frames (JSON lines) headlessly and print tick output
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// List available cameras
    #[arg(long)]
    pub list: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}
