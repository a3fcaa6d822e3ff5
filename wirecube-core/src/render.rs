/// The drawing interface the effect needs from a 2D renderer
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use crate::color::Rgba;
use crate::error::RenderError;
use crate::projection::ScreenPoint;

/// How a texture is combined with the target it is copied onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Overwrite the destination
    #[default]
    None,
    /// Source-over alpha blending
    Blend,
}

/// Filter used when a texture is stretched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    #[default]
    Nearest,
    Linear,
}

/// A 2D renderer with switchable render targets.
///
/// `None` as a render target means the renderer's default output. Drawing
/// calls (`clear`, `draw_point`, `draw_line`) overwrite pixels with the
/// current draw color; `copy_texture` stretches a texture over the whole
/// active target using the texture's scale and blend modes.
pub trait Renderer {
    type Texture: Copy + Eq + Debug;

    fn create_target_texture(
        &mut self,
        width: u32,
        height: u32,
        scale_mode: ScaleMode,
    ) -> Result<Self::Texture, RenderError>;

    fn destroy_texture(&mut self, texture: Self::Texture);

    fn set_texture_blend_mode(
        &mut self,
        texture: Self::Texture,
        mode: BlendMode,
    ) -> Result<(), RenderError>;

    fn render_target(&self) -> Option<Self::Texture>;

    fn set_render_target(&mut self, target: Option<Self::Texture>) -> Result<(), RenderError>;

    fn set_draw_color(&mut self, color: Rgba);

    fn clear(&mut self) -> Result<(), RenderError>;

    fn draw_point(&mut self, point: ScreenPoint) -> Result<(), RenderError>;

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint) -> Result<(), RenderError>;

    /// Connected polyline through every point
    fn draw_lines(&mut self, points: &[ScreenPoint]) -> Result<(), RenderError> {
        if let [only] = points {
            return self.draw_point(*only);
        }
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1])?;
        }
        Ok(())
    }

    fn copy_texture(&mut self, texture: Self::Texture) -> Result<(), RenderError>;
}

/// Switches a renderer to a new render target and puts the previous one
/// back when dropped.
pub struct TargetGuard<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    previous: Option<R::Texture>,
}

impl<'a, R: Renderer + ?Sized> TargetGuard<'a, R> {
    pub fn new(renderer: &'a mut R, target: Option<R::Texture>) -> Result<Self, RenderError> {
        let previous = renderer.render_target();
        renderer.set_render_target(target)?;
        Ok(Self { renderer, previous })
    }

    /// The target that will be restored
    pub fn previous(&self) -> Option<R::Texture> {
        self.previous
    }
}

impl<R: Renderer + ?Sized> Deref for TargetGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for TargetGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for TargetGuard<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.renderer.set_render_target(self.previous) {
            log::warn!("failed to restore render target {:?}: {}", self.previous, err);
        }
    }
}
