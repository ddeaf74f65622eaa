//! termcube: terminal ASCII software rasterizer
//!
//! Spins a small mesh through a software rasterization pipeline and prints
//! the shaded character grid to the terminal every frame:
//! - MVP transform with perspective divide and near/far clipping
//! - Whole-primitive viewport rejection
//! - Depth-tested scanline fill or wireframe rendering
//! - Flat directional shading with per-cell point-light falloff
//!
//! Controls: arrows rotate the camera, WASD moves it, Tab toggles
//! wireframe, 1/2 pick cube/pyramid, q or Esc quits.

mod app;
mod config;
mod rasterizer;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;

use app::{AppState, Command};
use config::RenderConfig;
use rasterizer::{render_frame, FrameBuffer, FrameGrid, Mesh};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            RenderConfig::load(&path).with_context(|| format!("loading config {}", path))?
        }
        None => RenderConfig::default(),
    };
    info!(
        "termcube v{}: {}x{} grid, {:?} mode",
        VERSION, config.grid_width, config.grid_height, config.mode
    );

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("enabling raw mode")?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut stdout, &config);

    // Restore the terminal even when the loop failed
    let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

/// The outer animation loop: input, update, render, present
fn run(stdout: &mut io::Stdout, config: &RenderConfig) -> Result<()> {
    let mut app = AppState::new(config);
    if let Some(path) = &config.mesh_path {
        app.mesh = Mesh::load(path).with_context(|| format!("loading mesh {}", path))?;
    }
    let mut grid = FrameGrid::new(config.grid_width, config.grid_height);
    let mut frame = FrameBuffer::new();

    let delay = Duration::from_millis(config.frame_delay_ms);
    let mut previous = Instant::now();

    while app.running {
        // Drain input for the duration of the frame delay
        let frame_start = Instant::now();
        while let Some(remaining) = delay.checked_sub(frame_start.elapsed()) {
            if !event::poll(remaining).context("polling input")? {
                break;
            }
            if let Event::Key(key) = event::read().context("reading input")? {
                if key.kind != KeyEventKind::Release {
                    if let Some(cmd) = decode_key(key.code) {
                        app.apply(cmd);
                    }
                }
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(previous).as_secs_f32();
        previous = now;

        app.update(delta);
        render_frame(&mut grid, &app.mesh, app.mvp(), &app.camera, &app.settings);

        frame.present(&grid);
        queue!(stdout, cursor::MoveTo(0, 0), Print(frame.front()))?;
        stdout.flush().context("flushing frame")?;
    }

    info!("termcube exiting");
    Ok(())
}

fn decode_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left => Some(Command::RotateLeft),
        KeyCode::Right => Some(Command::RotateRight),
        KeyCode::Up => Some(Command::PitchUp),
        KeyCode::Down => Some(Command::PitchDown),
        KeyCode::Char('w') => Some(Command::MoveForward),
        KeyCode::Char('s') => Some(Command::MoveBack),
        KeyCode::Char('a') => Some(Command::StrafeLeft),
        KeyCode::Char('d') => Some(Command::StrafeRight),
        KeyCode::Tab => Some(Command::ToggleMode),
        KeyCode::Char('1') => Some(Command::SelectCube),
        KeyCode::Char('2') => Some(Command::SelectPyramid),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_key_bindings() {
        assert_eq!(decode_key(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(decode_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(decode_key(KeyCode::Tab), Some(Command::ToggleMode));
        assert_eq!(decode_key(KeyCode::Left), Some(Command::RotateLeft));
        assert_eq!(decode_key(KeyCode::Char('x')), None);
    }
}
