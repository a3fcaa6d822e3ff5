/// The rotating wireframe cube effect
use std::fmt::Debug;

use crate::clock::TickSource;
use crate::color::Rgba;
use crate::config::{EffectConfig, LineMode};
use crate::error::{BufferKind, EffectError, RenderError};
use crate::geometry::{Vertex, WireCube, VERTEX_COUNT};
use crate::gradient::GradientCache;
use crate::projection::{ScreenPoint, Viewport, POINT_COUNT};
use crate::render::{BlendMode, Renderer, ScaleMode, TargetGuard};

/// Cube geometry plus the two render targets it is drawn with.
///
/// `T` is the texture handle type of the renderer the effect was created
/// on; the same renderer must be passed to every later call. Lifecycle is
/// `init`, then `update` once per displayed frame, then `destroy` before the
/// renderer goes away.
#[derive(Debug)]
pub struct CubeEffect<T> {
    config: EffectConfig,
    viewport: Viewport,
    cube: WireCube,
    cube_texture: T,
    gradient: GradientCache<T>,
    points: [ScreenPoint; POINT_COUNT],
    frames: u64,
}

impl<T: Copy + Eq + Debug> CubeEffect<T> {
    /// Set up the effect with default settings and the given line color
    pub fn init<R>(renderer: &mut R, line_color: Rgba) -> Result<Self, EffectError>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        Self::with_config(renderer, EffectConfig::with_line_color(line_color))
    }

    pub fn with_config<R>(renderer: &mut R, config: EffectConfig) -> Result<Self, EffectError>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        config.validate()?;

        let cube_texture = renderer
            .create_target_texture(config.width, config.height, ScaleMode::Nearest)
            .map_err(|source| EffectError::Allocation {
                buffer: BufferKind::Cube,
                source,
            })?;

        let gradient = match GradientCache::build(renderer) {
            Ok(gradient) => gradient,
            Err(err) => {
                renderer.destroy_texture(cube_texture);
                return Err(err);
            }
        };

        if let Err(source) = renderer.set_texture_blend_mode(cube_texture, BlendMode::Blend) {
            renderer.destroy_texture(cube_texture);
            gradient.destroy(renderer);
            return Err(EffectError::Render {
                buffer: BufferKind::Cube,
                source,
            });
        }

        let mut cube = WireCube::with_mode(config.transform);
        let s = config.initial_scale;
        cube.scale(s, s, s);
        cube.rotate(config.initial_rotation.0, config.initial_rotation.1);

        let viewport = Viewport::new(config.width, config.height);
        let points = viewport.project_edges(&cube);

        log::info!(
            "cube effect ready: {}x{} frame, line color {}, {:?} transform",
            config.width,
            config.height,
            config.line_color,
            config.transform
        );

        Ok(Self {
            config,
            viewport,
            cube,
            cube_texture,
            gradient,
            points,
            frames: 0,
        })
    }

    /// Advance the animation by one frame and composite it onto the
    /// renderer's active target.
    ///
    /// Drawing failures leave the frame incomplete but are otherwise ignored;
    /// the active target is restored on every path.
    pub fn update<R, C>(&mut self, renderer: &mut R, clock: &mut C)
    where
        R: Renderer<Texture = T> + ?Sized,
        C: TickSource + ?Sized,
    {
        let ticks = clock.ticks();
        self.step(ticks);

        let failures = self.compose(renderer);
        for (stage, err) in &failures {
            log::debug!("frame {}: {} failed: {}", self.frames, stage, err);
        }
        self.frames += 1;
    }

    /// Geometry half of `update`: pulse, rotate and re-project
    pub fn step(&mut self, ticks_ms: u32) {
        let f = self.config.scale_factor(ticks_ms);
        let (ax, ay) = self.config.rotation_step;
        self.cube.scale(f, f, f);
        self.cube.rotate(ax, ay);
        self.points = self.viewport.project_edges(&self.cube);
        log::trace!("frame {} at {} ms, scale factor {}", self.frames, ticks_ms, f);
    }

    fn compose<R>(&self, renderer: &mut R) -> Vec<(&'static str, RenderError)>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        let mut failures = Vec::new();
        let mut record = |stage: &'static str, result: Result<(), RenderError>| {
            if let Err(err) = result {
                failures.push((stage, err));
            }
        };

        match TargetGuard::new(renderer, Some(self.cube_texture)) {
            Ok(mut target) => {
                target.set_draw_color(self.config.background);
                record("clear", target.clear());
                record("gradient", self.gradient.draw(&mut *target));
                target.set_draw_color(self.config.line_color);
                record("lines", self.draw_lines(&mut *target));
            }
            Err(err) => record("select target", Err(err)),
        }
        record("composite", renderer.copy_texture(self.cube_texture));

        failures
    }

    fn draw_lines<R>(&self, renderer: &mut R) -> Result<(), RenderError>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        match self.config.lines {
            LineMode::Polyline => renderer.draw_lines(&self.points),
            LineMode::Segments => {
                for pair in self.points.chunks_exact(2) {
                    renderer.draw_line(pair[0], pair[1])?;
                }
                Ok(())
            }
        }
    }

    /// Release both render targets
    pub fn destroy<R>(self, renderer: &mut R)
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        renderer.destroy_texture(self.cube_texture);
        self.gradient.destroy(renderer);
        log::info!("cube effect destroyed after {} frames", self.frames);
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn cube(&self) -> &WireCube {
        &self.cube
    }

    pub fn vertices(&self) -> &[Vertex; VERTEX_COUNT] {
        self.cube.vertices()
    }

    /// Projected edge endpoints from the most recent frame
    pub fn points(&self) -> &[ScreenPoint; POINT_COUNT] {
        &self.points
    }

    /// Number of completed `update` calls
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cube_texture(&self) -> T {
        self.cube_texture
    }

    pub fn gradient_texture(&self) -> T {
        self.gradient.texture()
    }
}
