/// Cached two-pixel texture that the renderer stretches into a vertical gradient
use nalgebra::Point2;

use crate::color::Rgba;
use crate::error::{BufferKind, EffectError};
use crate::render::{BlendMode, Renderer, ScaleMode, TargetGuard};

pub const GRADIENT_WIDTH: u32 = 1;
pub const GRADIENT_HEIGHT: u32 = 2;

/// Color written to the top pixel
pub const GRADIENT_TOP: Rgba = Rgba::TRANSPARENT;
/// Color written to the bottom pixel
pub const GRADIENT_BOTTOM: Rgba = Rgba::BLACK;

/// A 1x2 linear-filtered texture, rendered once and then only read
#[derive(Debug)]
pub struct GradientCache<T> {
    texture: T,
}

impl<T: Copy + Eq + std::fmt::Debug> GradientCache<T> {
    /// Allocate the texture and draw its two pixels.
    ///
    /// The renderer's active target is the same before and after the call.
    pub fn build<R>(renderer: &mut R) -> Result<Self, EffectError>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        let texture = renderer
            .create_target_texture(GRADIENT_WIDTH, GRADIENT_HEIGHT, ScaleMode::Linear)
            .map_err(|source| EffectError::Allocation {
                buffer: BufferKind::Gradient,
                source,
            })?;

        if let Err(source) = Self::paint(renderer, texture) {
            renderer.destroy_texture(texture);
            return Err(EffectError::Render {
                buffer: BufferKind::Gradient,
                source,
            });
        }

        Ok(Self { texture })
    }

    fn paint<R>(renderer: &mut R, texture: T) -> Result<(), crate::error::RenderError>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        renderer.set_texture_blend_mode(texture, BlendMode::Blend)?;

        let mut target = TargetGuard::new(renderer, Some(texture))?;
        target.set_draw_color(Rgba::TRANSPARENT);
        target.clear()?;
        target.set_draw_color(GRADIENT_BOTTOM);
        target.draw_point(Point2::new(0, 1))?;
        target.set_draw_color(GRADIENT_TOP);
        target.draw_point(Point2::new(0, 0))?;
        Ok(())
    }

    pub fn texture(&self) -> T {
        self.texture
    }

    /// Stretch the gradient over the renderer's active target
    pub fn draw<R>(&self, renderer: &mut R) -> Result<(), crate::error::RenderError>
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        renderer.copy_texture(self.texture)
    }

    pub fn destroy<R>(self, renderer: &mut R)
    where
        R: Renderer<Texture = T> + ?Sized,
    {
        renderer.destroy_texture(self.texture);
    }
}
