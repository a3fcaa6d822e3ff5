/// Terminal host for the wireframe cube effect
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use wirecube_core::{
    Canvas, CanvasStats, CubeEffect, EffectConfig, FixedStepClock, Renderer, Rgba,
    SystemClock, TextureId, TickSource, Vertex, VERTEX_COUNT,
};

pub mod renderer;

pub use renderer::BlockRenderer;

/// Clear the canvas screen and run one effect update onto it
fn render_frame<C: TickSource>(
    canvas: &mut Canvas,
    effect: &mut CubeEffect<TextureId>,
    clock: &mut C,
) -> Result<()> {
    canvas.set_render_target(None)?;
    canvas.set_draw_color(Rgba::BLACK);
    canvas.clear()?;
    effect.update(canvas, clock);
    Ok(())
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    canvas: Canvas,
    effect: Option<CubeEffect<TextureId>>,
    clock: SystemClock,
    renderer: BlockRenderer,
    target_fps: u32,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: EffectConfig, target_fps: u32) -> Result<Self> {
        config.validate()?;
        let (width, height) = terminal::size().context("cannot query terminal size")?;
        let mut canvas = Canvas::new(config.width, config.height);
        let effect = CubeEffect::with_config(&mut canvas, config)?;

        Ok(Self {
            canvas,
            effect: Some(effect),
            clock: SystemClock::new(),
            renderer: BlockRenderer::new(width as usize, height as usize),
            target_fps: target_fps.max(1),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Run until the user quits; the effect is destroyed on every exit path
    pub fn run(&mut self) -> Result<()> {
        let result = self.run_in_terminal();

        if let Some(effect) = self.effect.take() {
            effect.destroy(&mut self.canvas);
        }

        result
    }

    fn run_in_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let result = match execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            Ok(()) => self.main_loop(),
            Err(err) => Err(err.into()),
        };

        // Cleanup
        let left = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let raw_off = terminal::disable_raw_mode();

        result?;
        left?;
        raw_off?;
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.target_fps as u64);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update()?;
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                log::debug!("{:.1} fps", self.fps);
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                kind: KeyEventKind::Press,
                ..
            }) => {
                self.running = false;
            }
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn update(&mut self) -> Result<()> {
        if let Some(effect) = self.effect.as_mut() {
            render_frame(&mut self.canvas, effect, &mut self.clock)?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.capture(self.canvas.screen());

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("wirecube | FPS: {:.1} | Q/Esc=Quit", self.fps)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub frames: u32,
    pub vertices: [Vertex; VERTEX_COUNT],
    pub stats: CanvasStats,
}

/// Run the effect without a terminal using a fixed-step clock, optionally
/// saving the last frame as a PNG
pub fn run_headless(
    config: EffectConfig,
    frames: u32,
    step_ms: u32,
    snapshot: Option<&Path>,
) -> Result<HeadlessReport> {
    config.validate()?;
    let mut canvas = Canvas::new(config.width, config.height);
    run_headless_on(&mut canvas, config, frames, step_ms, snapshot)
}

/// Headless run on a caller-owned canvas. The effect's textures are
/// released before any error is returned.
pub fn run_headless_on(
    canvas: &mut Canvas,
    config: EffectConfig,
    frames: u32,
    step_ms: u32,
    snapshot: Option<&Path>,
) -> Result<HeadlessReport> {
    let mut effect = CubeEffect::with_config(canvas, config)?;
    let result = drive_headless(canvas, &mut effect, frames, step_ms, snapshot);
    effect.destroy(canvas);
    result
}

fn drive_headless(
    canvas: &mut Canvas,
    effect: &mut CubeEffect<TextureId>,
    frames: u32,
    step_ms: u32,
    snapshot: Option<&Path>,
) -> Result<HeadlessReport> {
    let mut clock = FixedStepClock::new(0, step_ms);
    for _ in 0..frames {
        render_frame(canvas, effect, &mut clock)?;
    }

    if let Some(path) = snapshot {
        save_png(canvas.screen(), path)?;
        log::info!("wrote {}", path.display());
    }

    Ok(HeadlessReport {
        frames,
        vertices: *effect.vertices(),
        stats: canvas.stats(),
    })
}

fn save_png(surface: &wirecube_core::Surface, path: &Path) -> Result<()> {
    let image = image::RgbaImage::from_raw(surface.width(), surface.height(), surface.to_rgba_bytes())
        .context("surface size does not match its pixel data")?;
    image
        .save(path)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    Ok(())
}
