mod app;
mod state;

use anyhow::{Context, Result};
use app::GpuApp;
use clap::Parser;
use state::AppState;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tricube_common::ControlOptions;
use tricube_render::RecordingBackend;
use winit::dpi::PhysicalSize;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "tricube-desktop", about = "Three translucent rotating cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with the initial control options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Initial window width in physical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in physical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Render this many frames at 60 Hz without a window and print the last one
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
}

fn run_headless(mut state: AppState, frames: u32) -> Result<()> {
    let mut backend = RecordingBackend::new();
    for i in 0..frames {
        backend.clear();
        let now = Duration::from_secs_f64(i as f64 / 60.0);
        let Ok(()) = state.frame(&mut backend, now);
    }
    print!("{}", backend.describe_last_frame());
    let anim = state.renderer.animation();
    println!(
        "frames={} angle={:.4} distortion={:.3} speed={:.2}",
        state.renderer.frame_count(),
        anim.rotation_angle(),
        anim.distortion(),
        anim.rotation_speed()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("tricube-desktop starting");

    let options = match &cli.options {
        Some(path) => ControlOptions::load(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => ControlOptions::default(),
    };
    let state = AppState::new(options)?;

    if let Some(frames) = cli.headless {
        return run_headless(state, frames);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    match app.take_fatal() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
