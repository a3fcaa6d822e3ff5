/// In-memory software implementation of `Renderer`
use crate::color::Rgba;
use crate::error::RenderError;
use crate::projection::ScreenPoint;
use crate::render::{BlendMode, Renderer, ScaleMode};

const DEFAULT_MAX_TEXTURE_SIZE: u32 = 4096;

/// An RGBA pixel grid
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    scale_mode: ScaleMode,
    blend_mode: BlendMode,
    writes: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
            scale_mode: ScaleMode::Nearest,
            blend_mode: BlendMode::None,
            writes: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Number of draw operations that have modified this surface
    pub fn writes(&self) -> u64 {
        self.writes
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.index(x as u32, y as u32)])
        } else {
            None
        }
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if self.in_bounds(x, y) {
            let idx = self.index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Pixels as tightly packed RGBA bytes, row-major
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
        self.writes += 1;
    }

    fn point(&mut self, p: ScreenPoint, color: Rgba) {
        self.set_pixel(p.x, p.y, color);
        self.writes += 1;
    }

    /// Bresenham line, both endpoints included, clipped to the surface first
    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgba) {
        self.writes += 1;
        let Some((x0, y0, x1, y1)) = self.clip_line(from, to) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x as i32, y as i32, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Cohen-Sutherland clipping against the surface rectangle.
    ///
    /// Returns `None` when no part of the segment is visible.
    fn clip_line(&self, from: ScreenPoint, to: ScreenPoint) -> Option<(i64, i64, i64, i64)> {
        const INSIDE: u8 = 0;
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;
        // Converges in at most four passes for valid input.
        const MAX_ITERATIONS: u32 = 16;

        if self.width == 0 || self.height == 0 {
            return None;
        }
        let w = self.width as i64;
        let h = self.height as i64;

        let outcode = |x: i64, y: i64| -> u8 {
            let mut code = INSIDE;
            if x < 0 {
                code |= LEFT;
            } else if x >= w {
                code |= RIGHT;
            }
            if y < 0 {
                code |= TOP;
            } else if y >= h {
                code |= BOTTOM;
            }
            code
        };
        // Intersection offsets can exceed i64 for endpoints near the i32 limits.
        let along = |start: i64, delta: i64, num: i64, den: i64| -> i64 {
            start + (delta as i128 * num as i128 / den as i128) as i64
        };

        let (mut x0, mut y0) = (from.x as i64, from.y as i64);
        let (mut x1, mut y1) = (to.x as i64, to.y as i64);
        let mut code0 = outcode(x0, y0);
        let mut code1 = outcode(x1, y1);

        for _ in 0..MAX_ITERATIONS {
            if (code0 | code1) == 0 {
                return Some((x0, y0, x1, y1));
            }
            if (code0 & code1) != 0 {
                return None;
            }

            let code_out = if code0 != 0 { code0 } else { code1 };
            let dx = x1 - x0;
            let dy = y1 - y0;
            let (x, y) = if (code_out & BOTTOM) != 0 {
                (along(x0, dx, h - 1 - y0, dy), h - 1)
            } else if (code_out & TOP) != 0 {
                (along(x0, dx, -y0, dy), 0)
            } else if (code_out & RIGHT) != 0 {
                (w - 1, along(y0, dy, w - 1 - x0, dx))
            } else {
                (0, along(y0, dy, -x0, dx))
            };

            if code_out == code0 {
                (x0, y0) = (x, y);
                code0 = outcode(x0, y0);
            } else {
                (x1, y1) = (x, y);
                code1 = outcode(x1, y1);
            }
        }

        None
    }

    /// Sample at normalized coordinates using pixel-center mapping
    fn sample(&self, u: f32, v: f32) -> Rgba {
        let fx = u * self.width as f32 - 0.5;
        let fy = v * self.height as f32 - 0.5;
        match self.scale_mode {
            ScaleMode::Nearest => {
                let x = (fx + 0.5).floor() as i32;
                let y = (fy + 0.5).floor() as i32;
                self.clamped(x, y)
            }
            ScaleMode::Linear => {
                let x0 = fx.floor();
                let y0 = fy.floor();
                let (tx, ty) = (fx - x0, fy - y0);
                let (x0, y0) = (x0 as i32, y0 as i32);
                let top = self.clamped(x0, y0).lerp(self.clamped(x0 + 1, y0), tx);
                let bottom = self.clamped(x0, y0 + 1).lerp(self.clamped(x0 + 1, y0 + 1), tx);
                top.lerp(bottom, ty)
            }
        }
    }

    fn clamped(&self, x: i32, y: i32) -> Rgba {
        let x = x.clamp(0, self.width as i32 - 1);
        let y = y.clamp(0, self.height as i32 - 1);
        self.pixels[self.index(x as u32, y as u32)]
    }

    /// Stretch `src` over the whole of `self`
    fn blit(&mut self, src: &Surface) {
        for y in 0..self.height {
            let v = (y as f32 + 0.5) / self.height as f32;
            for x in 0..self.width {
                let u = (x as f32 + 0.5) / self.width as f32;
                let color = src.sample(u, v);
                let idx = self.index(x, y);
                self.pixels[idx] = match src.blend_mode {
                    BlendMode::None => color,
                    BlendMode::Blend => color.over(self.pixels[idx]),
                };
            }
        }
        self.writes += 1;
    }
}

/// Draw statistics, cumulative since the canvas was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasStats {
    pub clears: u64,
    pub points: u64,
    pub line_calls: u64,
    pub line_points: u64,
    pub copies: u64,
}

/// Software renderer: a screen surface plus a table of target textures
#[derive(Debug, Clone)]
pub struct Canvas {
    screen: Surface,
    textures: Vec<Option<Surface>>,
    target: Option<TextureId>,
    draw_color: Rgba,
    max_texture_size: u32,
    stats: CanvasStats,
}

/// Handle to a texture owned by a `Canvas`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            screen: Surface::new(width, height),
            textures: Vec::new(),
            target: None,
            draw_color: Rgba::BLACK,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            stats: CanvasStats::default(),
        }
    }

    /// Limit texture dimensions; larger requests fail to allocate
    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    pub fn screen(&self) -> &Surface {
        &self.screen
    }

    pub fn texture(&self, id: TextureId) -> Option<&Surface> {
        self.textures.get(id.0).and_then(Option::as_ref)
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    pub fn draw_color(&self) -> Rgba {
        self.draw_color
    }

    pub fn stats(&self) -> CanvasStats {
        self.stats
    }

    fn target_mut(&mut self) -> Result<&mut Surface, RenderError> {
        match self.target {
            None => Ok(&mut self.screen),
            Some(id) => self
                .textures
                .get_mut(id.0)
                .and_then(Option::as_mut)
                .ok_or(RenderError::UnknownTexture),
        }
    }

    fn texture_mut(&mut self, id: TextureId) -> Result<&mut Surface, RenderError> {
        self.textures
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(RenderError::UnknownTexture)
    }
}

impl Renderer for Canvas {
    type Texture = TextureId;

    fn create_target_texture(
        &mut self,
        width: u32,
        height: u32,
        scale_mode: ScaleMode,
    ) -> Result<TextureId, RenderError> {
        let reason = if width == 0 || height == 0 {
            Some("zero-sized texture")
        } else if width > self.max_texture_size || height > self.max_texture_size {
            Some("exceeds maximum texture size")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(RenderError::TextureCreate {
                width,
                height,
                reason: reason.to_string(),
            });
        }

        let mut surface = Surface::new(width, height);
        surface.scale_mode = scale_mode;

        let slot = self.textures.iter().position(Option::is_none);
        let id = match slot {
            Some(index) => {
                self.textures[index] = Some(surface);
                TextureId(index)
            }
            None => {
                self.textures.push(Some(surface));
                TextureId(self.textures.len() - 1)
            }
        };
        log::trace!("created {}x{} texture {:?}", width, height, id);
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(slot) = self.textures.get_mut(texture.0) {
            *slot = None;
        }
        if self.target == Some(texture) {
            self.target = None;
        }
    }

    fn set_texture_blend_mode(
        &mut self,
        texture: TextureId,
        mode: BlendMode,
    ) -> Result<(), RenderError> {
        self.texture_mut(texture)?.blend_mode = mode;
        Ok(())
    }

    fn render_target(&self) -> Option<TextureId> {
        self.target
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> Result<(), RenderError> {
        if let Some(id) = target {
            self.texture_mut(id)?;
        }
        self.target = target;
        Ok(())
    }

    fn set_draw_color(&mut self, color: Rgba) {
        self.draw_color = color;
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        let color = self.draw_color;
        self.target_mut()?.fill(color);
        self.stats.clears += 1;
        Ok(())
    }

    fn draw_point(&mut self, point: ScreenPoint) -> Result<(), RenderError> {
        let color = self.draw_color;
        self.target_mut()?.point(point, color);
        self.stats.points += 1;
        Ok(())
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint) -> Result<(), RenderError> {
        let color = self.draw_color;
        self.target_mut()?.line(from, to, color);
        Ok(())
    }

    fn draw_lines(&mut self, points: &[ScreenPoint]) -> Result<(), RenderError> {
        let color = self.draw_color;
        let target = self.target_mut()?;
        match points {
            [] => {}
            [only] => target.point(*only, color),
            _ => {
                for pair in points.windows(2) {
                    target.line(pair[0], pair[1], color);
                }
            }
        }
        self.stats.line_calls += 1;
        self.stats.line_points += points.len() as u64;
        Ok(())
    }

    fn copy_texture(&mut self, texture: TextureId) -> Result<(), RenderError> {
        if self.target == Some(texture) {
            return Err(RenderError::Draw("cannot copy a texture onto itself".into()));
        }
        // Taken out of its slot so the target can be borrowed mutably.
        let source = self
            .textures
            .get_mut(texture.0)
            .and_then(Option::take)
            .ok_or(RenderError::UnknownTexture)?;
        let result = self.target_mut().map(|target| target.blit(&source));
        self.textures[texture.0] = Some(source);
        result?;
        self.stats.copies += 1;
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(320, 240)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn point(x: i32, y: i32) -> ScreenPoint {
        Point2::new(x, y)
    }

    #[test]
    fn test_create_texture_limits() {
        let mut canvas = Canvas::new(8, 8).with_max_texture_size(16);
        assert!(canvas.create_target_texture(0, 4, ScaleMode::Nearest).is_err());
        assert!(canvas.create_target_texture(17, 4, ScaleMode::Nearest).is_err());
        let id = canvas.create_target_texture(16, 4, ScaleMode::Linear).unwrap();
        assert_eq!(canvas.texture(id).unwrap().scale_mode(), ScaleMode::Linear);
        assert_eq!(canvas.texture_count(), 1);
    }

    #[test]
    fn test_destroyed_slots_are_reused() {
        let mut canvas = Canvas::new(8, 8);
        let a = canvas.create_target_texture(2, 2, ScaleMode::Nearest).unwrap();
        let b = canvas.create_target_texture(2, 2, ScaleMode::Nearest).unwrap();
        canvas.destroy_texture(a);
        assert!(canvas.texture(a).is_none());
        assert!(canvas.set_render_target(Some(a)).is_err());

        let c = canvas.create_target_texture(3, 3, ScaleMode::Nearest).unwrap();
        assert_eq!(c, a);
        assert_ne!(c, b);
        assert_eq!(canvas.texture_count(), 2);
    }

    #[test]
    fn test_clear_and_point_overwrite() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_draw_color(Rgba::new(0, 0, 0, 200));
        canvas.clear().unwrap();
        canvas.set_draw_color(Rgba::new(255, 0, 0, 10));
        canvas.draw_point(point(1, 2)).unwrap();

        assert_eq!(canvas.screen().pixel(1, 2), Some(Rgba::new(255, 0, 0, 10)));
        assert_eq!(canvas.screen().pixel(0, 0), Some(Rgba::new(0, 0, 0, 200)));
        assert_eq!(canvas.screen().pixel(4, 0), None);
    }

    #[test]
    fn test_line_includes_endpoints_and_clips() {
        let mut canvas = Canvas::new(10, 10);
        canvas.set_draw_color(Rgba::WHITE);
        canvas.draw_line(point(-5, 3), point(9, 3)).unwrap();
        for x in 0..10 {
            assert_eq!(canvas.screen().pixel(x, 3), Some(Rgba::WHITE));
        }

        canvas.draw_line(point(2, 2), point(6, 6)).unwrap();
        for i in 2..=6 {
            assert_eq!(canvas.screen().pixel(i, i), Some(Rgba::WHITE));
        }
    }

    #[test]
    fn test_far_off_surface_endpoints() {
        let mut canvas = Canvas::new(10, 10);
        canvas.set_draw_color(Rgba::WHITE);
        canvas
            .draw_line(point(-1_000_000_000, 5), point(1_000_000_000, 5))
            .unwrap();
        for x in 0..10 {
            assert_eq!(canvas.screen().pixel(x, 5), Some(Rgba::WHITE));
        }

        canvas
            .draw_line(point(i32::MIN, i32::MIN), point(i32::MAX, i32::MAX))
            .unwrap();
        for i in 0..10 {
            assert_eq!(canvas.screen().pixel(i, i), Some(Rgba::WHITE));
        }

        let mut untouched = Canvas::new(10, 10);
        untouched.set_draw_color(Rgba::WHITE);
        untouched
            .draw_line(point(i32::MIN, -1), point(i32::MAX, -1))
            .unwrap();
        untouched
            .draw_lines(&[point(i32::MAX, 0), point(i32::MAX, i32::MAX), point(20, i32::MIN)])
            .unwrap();
        assert!(untouched.screen().pixels().iter().all(|&p| p == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_draw_lines_is_a_polyline() {
        let mut canvas = Canvas::new(10, 10);
        canvas.set_draw_color(Rgba::WHITE);
        canvas
            .draw_lines(&[point(0, 0), point(4, 0), point(4, 4)])
            .unwrap();
        assert_eq!(canvas.screen().pixel(2, 0), Some(Rgba::WHITE));
        assert_eq!(canvas.screen().pixel(4, 2), Some(Rgba::WHITE));
        assert_eq!(canvas.screen().pixel(2, 2), Some(Rgba::TRANSPARENT));
        assert_eq!(canvas.stats().line_points, 3);
        assert_eq!(canvas.stats().line_calls, 1);
    }

    #[test]
    fn test_linear_copy_interpolates() {
        let mut canvas = Canvas::new(1, 4);
        let tex = canvas.create_target_texture(1, 2, ScaleMode::Linear).unwrap();
        canvas.set_render_target(Some(tex)).unwrap();
        canvas.set_draw_color(Rgba::new(0, 0, 0, 0));
        canvas.draw_point(point(0, 0)).unwrap();
        canvas.set_draw_color(Rgba::new(0, 0, 0, 255));
        canvas.draw_point(point(0, 1)).unwrap();
        canvas.set_render_target(None).unwrap();
        canvas.copy_texture(tex).unwrap();

        let alphas: Vec<u8> = (0..4)
            .map(|y| canvas.screen().pixel(0, y).unwrap().a)
            .collect();
        assert_eq!(alphas, vec![0, 64, 191, 255]);
    }

    #[test]
    fn test_nearest_copy_blends_when_enabled() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_draw_color(Rgba::opaque(0, 0, 255));
        canvas.clear().unwrap();

        let tex = canvas.create_target_texture(1, 1, ScaleMode::Nearest).unwrap();
        canvas.set_render_target(Some(tex)).unwrap();
        canvas.set_draw_color(Rgba::new(255, 0, 0, 0));
        canvas.clear().unwrap();
        canvas.set_render_target(None).unwrap();

        canvas.copy_texture(tex).unwrap();
        assert_eq!(canvas.screen().pixel(1, 1), Some(Rgba::new(255, 0, 0, 0)));

        canvas.set_draw_color(Rgba::opaque(0, 0, 255));
        canvas.clear().unwrap();
        canvas.set_texture_blend_mode(tex, BlendMode::Blend).unwrap();
        canvas.copy_texture(tex).unwrap();
        assert_eq!(canvas.screen().pixel(1, 1), Some(Rgba::opaque(0, 0, 255)));
    }

    #[test]
    fn test_copy_onto_itself_fails() {
        let mut canvas = Canvas::new(2, 2);
        let tex = canvas.create_target_texture(1, 1, ScaleMode::Nearest).unwrap();
        canvas.set_render_target(Some(tex)).unwrap();
        assert!(canvas.copy_texture(tex).is_err());
        assert!(canvas.texture(tex).is_some());
    }

    #[test]
    fn test_writes_are_counted() {
        let mut canvas = Canvas::new(2, 2);
        let tex = canvas.create_target_texture(2, 2, ScaleMode::Nearest).unwrap();
        assert_eq!(canvas.texture(tex).unwrap().writes(), 0);
        canvas.set_render_target(Some(tex)).unwrap();
        canvas.clear().unwrap();
        canvas.draw_point(point(0, 0)).unwrap();
        assert_eq!(canvas.texture(tex).unwrap().writes(), 2);
        assert_eq!(canvas.screen().writes(), 0);
    }

    #[test]
    fn test_rgba_bytes_layout() {
        let mut canvas = Canvas::new(2, 1);
        canvas.set_draw_color(Rgba::new(1, 2, 3, 4));
        canvas.draw_point(point(1, 0)).unwrap();
        assert_eq!(canvas.screen().to_rgba_bytes(), vec![0, 0, 0, 0, 1, 2, 3, 4]);
    }
}
