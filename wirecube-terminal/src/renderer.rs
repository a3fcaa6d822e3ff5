/// Half-block presenter that maps an RGBA surface onto terminal cells
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wirecube_core::{Rgba, Surface};

/// Upper half block: the foreground color paints the top pixel, the
/// background color the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Color shown behind translucent pixels
const BACKDROP: Rgba = Rgba::BLACK;

/// Down-samples a surface to `width` x `height` cells, two pixels per cell
pub struct BlockRenderer {
    width: usize,
    height: usize,
    top: Vec<Rgba>,
    bottom: Vec<Rgba>,
}

impl BlockRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            top: vec![BACKDROP; size],
            bottom: vec![BACKDROP; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    /// The (top, bottom) colors of a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<(Rgba, Rgba)> {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            Some((self.top[idx], self.bottom[idx]))
        } else {
            None
        }
    }

    /// Nearest-sample the surface into the cell grid
    pub fn capture(&mut self, surface: &Surface) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let rows = self.height * 2;
        let sample = |x: usize, row: usize| -> Rgba {
            let sx = x * surface.width() as usize / self.width;
            let sy = row * surface.height() as usize / rows;
            surface
                .pixel(sx as i32, sy as i32)
                .map(|p| p.over(BACKDROP))
                .unwrap_or(BACKDROP)
        };

        let mut top = vec![BACKDROP; self.width * self.height];
        let mut bottom = top.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                top[idx] = sample(x, y * 2);
                bottom[idx] = sample(x, y * 2 + 1);
            }
        }
        self.top = top;
        self.bottom = bottom;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(to_color(self.top[idx])))?;
                writer.queue(SetBackgroundColor(to_color(self.bottom[idx])))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirecube_core::{Canvas, Renderer, ScreenPoint};

    #[test]
    fn test_capture_samples_two_rows_per_cell() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_draw_color(Rgba::opaque(255, 0, 0));
        canvas.draw_point(ScreenPoint::new(0, 0)).unwrap();
        canvas.set_draw_color(Rgba::opaque(0, 255, 0));
        canvas.draw_point(ScreenPoint::new(0, 1)).unwrap();

        let mut renderer = BlockRenderer::new(4, 2);
        renderer.capture(canvas.screen());
        assert_eq!(
            renderer.cell(0, 0),
            Some((Rgba::opaque(255, 0, 0), Rgba::opaque(0, 255, 0)))
        );
        // Untouched transparent pixels show the backdrop.
        assert_eq!(renderer.cell(3, 1), Some((BACKDROP, BACKDROP)));
        assert_eq!(renderer.cell(4, 0), None);
    }

    #[test]
    fn test_capture_composites_translucent_pixels() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_draw_color(Rgba::new(255, 255, 255, 0));
        canvas.clear().unwrap();

        let mut renderer = BlockRenderer::new(1, 1);
        renderer.capture(canvas.screen());
        assert_eq!(renderer.cell(0, 0), Some((Rgba::BLACK, Rgba::BLACK)));
    }

    #[test]
    fn test_draw_emits_one_glyph_per_cell() {
        let renderer = BlockRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }

    #[test]
    fn test_zero_sized_renderer_is_inert() {
        let canvas = Canvas::new(4, 4);
        let mut renderer = BlockRenderer::new(0, 0);
        renderer.capture(canvas.screen());
        assert_eq!(renderer.cell(0, 0), None);
    }
}
