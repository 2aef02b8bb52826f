/// Terminal front-end for the spin3d pipeline
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use spin3d_core::{AnimationState, FrameOrchestrator, Mesh, RenderConfig};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Radians per tick added or removed by the left/right keys
pub const STEP_INCREMENT: f32 = 0.005;
/// Distance change for the up/down keys
pub const ZOOM_INCREMENT: f32 = 0.5;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Quit,
    TogglePause,
    AdjustStep(f32),
    AdjustDistance(f32),
}

impl Control {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Control::Quit),
            KeyCode::Char(' ') => Some(Control::TogglePause),
            KeyCode::Right => Some(Control::AdjustStep(STEP_INCREMENT)),
            KeyCode::Left => Some(Control::AdjustStep(-STEP_INCREMENT)),
            KeyCode::Up => Some(Control::AdjustDistance(-ZOOM_INCREMENT)),
            KeyCode::Down => Some(Control::AdjustDistance(ZOOM_INCREMENT)),
            _ => None,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    frames: FrameOrchestrator,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &RenderConfig) -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        Self::with_size(mesh, config, width as usize, height as usize)
    }

    pub fn with_size(
        mesh: Mesh,
        config: &RenderConfig,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let renderer = AsciiRenderer::new(width, height);
        let (vw, vh) = renderer.viewport_size();
        let frames = FrameOrchestrator::new(mesh, config, vw, vh)
            .context("invalid render configuration")?;

        Ok(Self {
            frames,
            renderer,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn frames(&self) -> &FrameOrchestrator {
        &self.frames
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        info!("rendering {} triangles", self.frames.mesh().len());

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.step_frame();
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(control) = Control::from_key(code) {
                    self.apply(control);
                }
            }
            Event::Resize(width, height) => self.resize(width as usize, height as usize)?,
            _ => {}
        }
        Ok(())
    }

    pub fn apply(&mut self, control: Control) {
        match control {
            Control::Quit => self.running = false,
            Control::TogglePause => self.frames.toggle_pause(),
            Control::AdjustStep(delta) => self.frames.adjust_rotation_step(delta),
            Control::AdjustDistance(delta) => self.frames.adjust_distance(delta),
        }
        debug!(
            "{:?}: step {:.3}, distance {:.1}",
            control,
            self.frames.rotation_step(),
            self.frames.distance()
        );
    }

    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        self.renderer.resize(width, height);
        let (vw, vh) = self.renderer.viewport_size();
        self.frames
            .resize(vw, vh)
            .with_context(|| format!("resizing to {}x{}", width, height))
    }

    /// Advance one tick and paint it into the character grid
    pub fn step_frame(&mut self) {
        let list = self.frames.tick();
        self.renderer.clear();
        self.renderer.fill_draw_list(&list);
    }

    pub fn status_lines(&self) -> [String; 3] {
        let paused = match self.frames.state() {
            AnimationState::Idle => " (paused)",
            AnimationState::Animating => "",
        };
        [
            format!(
                "spin3d | FPS: {:.1} | Esc/Q=Quit Space=Pause Left/Right=Speed Up/Down=Zoom",
                self.fps
            ),
            format!(
                "rotation: {:.3} rad/frame{} | angle: {:.2} rad",
                self.frames.rotation_step(),
                paused,
                self.frames.angle()
            ),
            format!("zoom: {:.3}", 1.0 / self.frames.distance()),
        ]
    }

    fn present(&mut self) -> Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        for (row, line) in self.status_lines().iter().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, row as u16),
                SetForegroundColor(Color::Yellow),
                Print(line),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TerminalApp {
        TerminalApp::with_size(Mesh::cube(2.0), &RenderConfig::default(), 80, 24).unwrap()
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Control::from_key(KeyCode::Esc), Some(Control::Quit));
        assert_eq!(Control::from_key(KeyCode::Char(' ')), Some(Control::TogglePause));
        assert_eq!(
            Control::from_key(KeyCode::Up),
            Some(Control::AdjustDistance(-ZOOM_INCREMENT))
        );
        assert_eq!(Control::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_controls_drive_orchestrator() {
        let mut app = app();
        let step = app.frames().rotation_step();
        app.apply(Control::AdjustStep(STEP_INCREMENT));
        assert!((app.frames().rotation_step() - (step + STEP_INCREMENT)).abs() < 1e-6);

        for _ in 0..20 {
            app.apply(Control::AdjustStep(-STEP_INCREMENT));
        }
        assert_eq!(app.frames().rotation_step(), 0.0);

        let distance = app.frames().distance();
        app.apply(Control::AdjustDistance(-ZOOM_INCREMENT));
        assert!((app.frames().distance() - (distance - ZOOM_INCREMENT)).abs() < 1e-6);

        app.apply(Control::TogglePause);
        assert_eq!(app.frames().state(), AnimationState::Idle);
        assert!(app.status_lines()[1].contains("paused"));

        app.apply(Control::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_step_frame_paints_cells() {
        let mut app = app();
        app.step_frame();
        assert!(app.renderer().to_text().chars().any(|c| c != ' ' && c != '\n'));
    }

    #[test]
    fn test_resize_follows_terminal() {
        let mut app = app();
        app.resize(120, 40).unwrap();
        assert_eq!(app.renderer().viewport_size(), (120, 80));
        assert_eq!(app.frames().viewport().height, 80);
    }
}
