/// wirecube terminal demo - rotating wireframe cube
///
/// Renders the effect into an in-memory canvas and shows it in the terminal
/// with half-block glyphs, or runs it headless for a fixed number of frames.
/// Controls:
///   - Q/ESC: Quit

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use wirecube_core::{EffectConfig, LineMode, PulseMode, Rgba, TransformMode};
use wirecube_terminal::{run_headless, TerminalApp};

#[derive(Parser)]
#[command(name = "wirecube-terminal")]
#[command(about = "Rotating wireframe cube effect")]
struct Args {
    #[arg(short, long, default_value = "255,255,255,255", help = "Line color as r,g,b[,a] or #rrggbb[aa]")]
    color: Rgba,

    #[arg(long, default_value_t = 30, help = "Target frames per second")]
    fps: u32,

    #[arg(long, help = "Run without a terminal UI")]
    headless: bool,

    #[arg(long, default_value_t = 360, help = "Frames to render in headless mode")]
    frames: u32,

    #[arg(long, default_value_t = 1000, help = "Clock step per headless frame in ms")]
    step_ms: u32,

    #[arg(long, help = "Write the last headless frame to this PNG file")]
    snapshot: Option<PathBuf>,

    #[arg(long, help = "Pulse with fractional seconds instead of whole seconds")]
    smooth_pulse: bool,

    #[arg(long, help = "Draw each edge as its own segment")]
    segments: bool,

    #[arg(long, help = "Accumulate a model matrix instead of mutating vertices")]
    composed: bool,
}

impl Args {
    fn effect_config(&self) -> EffectConfig {
        EffectConfig {
            pulse: if self.smooth_pulse {
                PulseMode::Smooth
            } else {
                PulseMode::Stepped
            },
            lines: if self.segments {
                LineMode::Segments
            } else {
                LineMode::Polyline
            },
            transform: if self.composed {
                TransformMode::Composed
            } else {
                TransformMode::InPlace
            },
            ..EffectConfig::with_line_color(self.color)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.effect_config();

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let report = run_headless(config, args.frames, args.step_ms, args.snapshot.as_deref())?;
        log::info!(
            "rendered {} frames, {} line points submitted",
            report.frames,
            report.stats.line_points
        );
        for (i, v) in report.vertices.iter().enumerate() {
            log::info!("vertex {}: ({:.4}, {:.4}, {:.4})", i, v.x, v.y, v.z);
        }
    } else {
        // Log output would tear the alternate screen, so it stays off unless asked for.
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
        let mut app = TerminalApp::new(config, args.fps)?;
        app.run()?;
    }

    Ok(())
}
