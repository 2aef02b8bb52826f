/// spin3d Terminal Demo - Rotating Mesh
///
/// Renders an OBJ mesh (or a built-in cube) spinning in the terminal.
/// Controls:
///   - Left/Right: Slow down / speed up the rotation
///   - Up/Down: Zoom in / out
///   - Space: Pause
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use spin3d_core::{obj, Mesh, RenderConfig, Winding};
use spin3d_terminal::TerminalApp;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spin3d-terminal", version, about = "Spin a 3D mesh in the terminal")]
struct Args {
    /// Triangulated OBJ file to render (defaults to a cube)
    mesh: Option<PathBuf>,

    /// TOML render configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat counter-clockwise faces as front faces. Most OBJ exporters wind
    /// outward faces counter-clockwise, so pass this if such a mesh renders
    /// inside-out.
    #[arg(long)]
    ccw: bool,

    /// Initial distance from the camera
    #[arg(long)]
    distance: Option<f32>,

    /// Rotation per frame in radians
    #[arg(long)]
    step: Option<f32>,
}

fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if args.ccw {
        config.winding = Winding::CounterClockwise;
    }
    if let Some(distance) = args.distance {
        config.distance = distance;
    }
    if let Some(step) = args.step {
        config.rotation_step = step;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let mesh = match &args.mesh {
        Some(path) => obj::load_obj(path).with_context(|| format!("loading mesh {}", path.display()))?,
        None => Mesh::cube(2.0),
    };
    info!("starting with {} triangles", mesh.len());

    println!("spin3d terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(mesh, &config)?;
    app.run()?;

    println!("Thank you for using spin3d!");
    Ok(())
}
