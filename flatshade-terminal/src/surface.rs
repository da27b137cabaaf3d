//! Character-cell drawing surface for terminals
use crossterm::{
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use flatshade_core::{ndc_to_pixel, Color, Vector3};
use std::io::Write;

/// Fill characters from darkest to lightest
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const EDGE_CHAR: char = 'o';

/// Cells on a triangle edge count as inside.
const EDGE_EPSILON: f64 = 1e-9;

/// Target of the host's draw calls. Polygon vertices arrive in normalized
/// device coordinates; mapping them to pixels is the surface's job.
pub trait DrawSurface {
    /// Surface size in pixels (cells for a terminal).
    fn size(&self) -> (usize, usize);

    fn clear(&mut self, color: Color);

    fn fill_polygon(&mut self, color: Color, ndc: &[Vector3]);

    fn stroke_polygon(&mut self, color: Color, ndc: &[Vector3]);

    /// Text anchored at pixel `(x, y)`.
    fn draw_text(&mut self, x: usize, y: usize, color: Color, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

/// Cell buffer flushed to a terminal with crossterm
///
/// Faces are painted in arrival order with no depth test; the renderer
/// already hands them over farthest first.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    background: Color,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        let background = Color::default();
        Self {
            width,
            height,
            background,
            cells: vec![blank(background); width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![blank(self.background); width * height];
    }

    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        self.cell_index(x as i64, y as i64).map(|i| self.cells[i].glyph)
    }

    /// Buffer contents as plain text, one string per row.
    pub fn lines(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.glyph).collect())
            .collect()
    }

    /// Queues the whole buffer, row by row, onto `writer`.
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_terminal(self.background)))?;

        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            writer.queue(crossterm::cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(to_terminal(cell.color)))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }

        writer.queue(ResetColor)?;
        Ok(())
    }

    fn cell_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn put(&mut self, x: i64, y: i64, glyph: char, color: Color) {
        if let Some(i) = self.cell_index(x, y) {
            self.cells[i] = Cell { glyph, color };
        }
    }

    fn to_pixels(&self, ndc: &[Vector3]) -> Vec<(f64, f64)> {
        ndc.iter()
            .map(|&p| ndc_to_pixel(p, self.width as f64, self.height as f64))
            .collect()
    }

    fn fill_triangle(&mut self, v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), glyph: char, color: Color) {
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i64).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i64).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64, y as f64);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= -EDGE_EPSILON && w1 >= -EDGE_EPSILON && w2 >= -EDGE_EPSILON {
                        self.put(x, y, glyph, color);
                    }
                }
            }
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from.0 + dx * t).floor() as i64;
            let y = (from.1 + dy * t).floor() as i64;
            self.put(x, y, EDGE_CHAR, color);
        }
    }
}

impl DrawSurface for TerminalSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.background = color;
        self.cells.fill(blank(color));
    }

    fn fill_polygon(&mut self, color: Color, ndc: &[Vector3]) {
        let points = self.to_pixels(ndc);
        let Some((&first, rest)) = points.split_first() else {
            return;
        };

        let glyph = shade_glyph(color);
        // triangle fan
        for pair in rest.windows(2) {
            self.fill_triangle(first, pair[0], pair[1], glyph, color);
        }
    }

    fn stroke_polygon(&mut self, color: Color, ndc: &[Vector3]) {
        let points = self.to_pixels(ndc);
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.line(from, to, color);
        }
    }

    fn draw_text(&mut self, x: usize, y: usize, color: Color, text: &str) {
        for (i, glyph) in text.chars().enumerate() {
            self.put((x + i) as i64, y as i64, glyph, color);
        }
    }
}

fn blank(background: Color) -> Cell {
    Cell {
        glyph: ' ',
        color: background,
    }
}

/// Ramp character for a color's brightness.
fn shade_glyph(color: Color) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (color.luminance() * last as f64).round().clamp(0.0, last as f64) as usize;
    LUMINOSITY_RAMP[index]
}

fn to_terminal(color: Color) -> style::Color {
    let (r, g, b) = color.to_rgb8();
    style::Color::Rgb { r, g, b }
}

/// Barycentric weights of `p`, or `None` for a degenerate triangle.
fn barycentric(v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), p: (f64, f64)) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(255.0, 255.0, 255.0);

    fn full_screen_quad() -> Vec<Vector3> {
        vec![
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(-1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_shade_glyph_follows_luminance() {
        assert_eq!(shade_glyph(Color::new(0.0, 0.0, 0.0)), '.');
        assert_eq!(shade_glyph(WHITE), '@');
    }

    #[test]
    fn test_fill_covers_quad() {
        let mut surface = TerminalSurface::new(10, 6);
        surface.fill_polygon(WHITE, &full_screen_quad());

        for line in surface.lines() {
            assert_eq!(line, "@@@@@@@@@@");
        }
    }

    #[test]
    fn test_fill_ignores_winding() {
        let mut quad = full_screen_quad();
        quad.reverse();
        let mut surface = TerminalSurface::new(8, 4);
        surface.fill_polygon(WHITE, &quad);
        assert_eq!(surface.glyph(3, 2), Some('@'));
    }

    #[test]
    fn test_stroke_leaves_interior_blank() {
        let mut surface = TerminalSurface::new(10, 6);
        surface.stroke_polygon(WHITE, &full_screen_quad());

        assert_eq!(surface.glyph(0, 0), Some(EDGE_CHAR));
        assert_eq!(surface.glyph(9, 5), Some(EDGE_CHAR));
        assert_eq!(surface.glyph(0, 3), Some(EDGE_CHAR));
        assert_eq!(surface.glyph(4, 3), Some(' '));
    }

    #[test]
    fn test_clear_and_text_clipping() {
        let mut surface = TerminalSurface::new(5, 2);
        surface.fill_polygon(WHITE, &full_screen_quad());
        surface.clear(Color::new(20.0, 20.0, 65.0));
        assert_eq!(surface.lines(), vec!["     ", "     "]);

        surface.draw_text(2, 1, WHITE, "cube!");
        assert_eq!(surface.lines()[1], "  cub");
        assert_eq!(surface.glyph(7, 1), None);
    }

    #[test]
    fn test_present_writes_every_cell() {
        let mut surface = TerminalSurface::new(3, 2);
        surface.draw_text(0, 0, WHITE, "abc");

        let mut out = Vec::new();
        surface.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("abc"));
    }
}
