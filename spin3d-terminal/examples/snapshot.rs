/// Example: print a few frames of a mesh as plain text, without taking over
/// the terminal
///
/// Usage: cargo run --example snapshot -- [path/to/file.obj] [frames]

use anyhow::Result;
use spin3d_core::{obj, Mesh, RenderConfig};
use spin3d_terminal::TerminalApp;
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => obj::load_obj(path)?,
        None => {
            eprintln!("No OBJ file provided, using default cube...");
            Mesh::cube(2.0)
        }
    };
    let frames: usize = args.get(2).and_then(|n| n.parse().ok()).unwrap_or(3);

    let config = RenderConfig {
        distance: 4.0,
        rotation_step: 0.3,
        ..RenderConfig::default()
    };
    let mut app = TerminalApp::with_size(mesh, &config, 60, 24)?;
    for _ in 0..frames {
        app.step_frame();
        println!("{}", app.renderer().to_text());
    }
    Ok(())
}
