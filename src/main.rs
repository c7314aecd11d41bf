use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod args;

use args::Args;
use blink_pointer::camera::{self, CameraSource};
use blink_pointer::config::AppConfig;
use blink_pointer::hud::{self, Canvas};
use blink_pointer::inference::FaceMeshPipeline;
use blink_pointer::output::WindowOutput;
use blink_pointer::pipeline::{LandmarkPipeline, SimulatedFacePipeline};
use blink_pointer::replay;
use blink_pointer::session::Session;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stderr, so replay output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn create_pipeline(config: &AppConfig, simulate: bool) -> Box<dyn LandmarkPipeline> {
    if simulate {
        return Box::new(SimulatedFacePipeline::new(&config.tracking));
    }
    if !Path::new(&config.models.face_mesh).exists() {
        warn!(
            "Face mesh model {} not found, using simulated face",
            config.models.face_mesh
        );
        return Box::new(SimulatedFacePipeline::new(&config.tracking));
    }
    match FaceMeshPipeline::new(&config.models) {
        Ok(p) => Box::new(p),
        Err(e) => {
            warn!("Failed to load face mesh: {:#}. Using simulated face", e);
            Box::new(SimulatedFacePipeline::new(&config.tracking))
        }
    }
}

fn run_replay(session: &mut Session, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    replay::run(session, BufReader::new(file), io::stdout().lock())?;
    Ok(())
}

fn run_live(session: &mut Session, config: &AppConfig, args: &Args) -> Result<()> {
    let mut camera = CameraSource::new(args.cam_index, args.mirror)?;
    info!("Capturing from {}", camera.name());

    let mut pipeline = create_pipeline(config, args.simulate);
    info!("Active Pipeline: {}", pipeline.name());

    let viewport = config.tracking.viewport();
    let mut window = WindowOutput::new(
        &config.ui.window_title,
        viewport.width as usize,
        viewport.height as usize,
    )?;
    info!("Controls: [Q] or [Esc] to quit");

    while !window.quit_requested() {
        // The only blocking point of the loop.
        let frame = match camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Ignoring empty camera frame: {:#}", e);
                window.pump();
                continue;
            }
        };

        let face = pipeline.process(&frame).unwrap_or_else(|e| {
            warn!("Landmark extraction failed: {:#}", e);
            None
        });
        let tick = session.tick(face.as_ref());

        let mut canvas = Canvas::from_frame(&frame, viewport);
        hud::draw_tick(&mut canvas, &tick, session.zones(), &config.ui);
        window.present(&canvas.pixels)?;
    }

    info!(
        ticks = session.ticks(),
        selected = session.selection().is_selected(),
        "Session ended"
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list {
        return camera::list_cameras();
    }

    let config = AppConfig::load(&args.config)?;
    let mut session = Session::new(&config).context("Invalid configuration")?;

    match &args.replay {
        Some(path) => run_replay(&mut session, path),
        None => run_live(&mut session, &config, &args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["blink_pointer"]).unwrap();
        assert_eq!(args.cam_index, 0);
        assert_eq!(args.config, Path::new("config.json"));
        assert!(args.replay.is_none());
        assert!(!args.simulate && !args.mirror && !args.list);
    }

    #[test]
    fn test_args_replay() {
        let args =
            Args::try_parse_from(["blink_pointer", "--replay", "frames.jsonl", "-v", "-c", "2"]).unwrap();
        assert_eq!(args.replay.as_deref(), Some(Path::new("frames.jsonl")));
        assert!(args.verbose);
        assert_eq!(args.cam_index, 2);
    }

    #[test]
    fn test_simulate_flag_selects_synthetic_pipeline() {
        let pipeline = create_pipeline(&AppConfig::default(), true);
        assert!(pipeline.name().contains("Simulated"));
    }
}
