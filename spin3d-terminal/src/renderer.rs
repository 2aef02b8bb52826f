/// Character-grid display surface for spin3d draw lists
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use spin3d_core::{Color, DrawCommand, DrawList};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: u32 = 2;

/// Fills draw-list polygons into a grid of colored characters.
///
/// Polygons are painted in list order with no depth test, so a back-to-front
/// list resolves overlaps the way a painter would.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Pixel size the pipeline should project into for this grid
    pub fn viewport_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32 * CELL_ASPECT)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        self.cells.get(y * self.width + x).copied().flatten()
    }

    pub fn fill_draw_list(&mut self, list: &DrawList) {
        for command in list.iter() {
            self.fill_polygon(command);
        }
    }

    pub fn fill_polygon(&mut self, command: &DrawCommand) {
        let aspect = CELL_ASPECT as f32;
        // Viewport pixels to cell coordinates
        let [v0, v1, v2] = command
            .points
            .map(|p| Point2::new(p.x, p.y / aspect));

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(&v0, &v1, &v2, &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.cells[y as usize * self.width + x as usize] = Some(command.color);
                    }
                }
            }
        }
    }

    fn glyph(color: Color) -> char {
        let level = color.luminance() as usize;
        LUMINOSITY_RAMP[level * (LUMINOSITY_RAMP.len() - 1) / 255]
    }

    /// Plain-text rendering of the grid, one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|c| c.map_or(' ', Self::glyph)));
            out.push('\n');
        }
        out
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(color) => {
                        if current != Some(color) {
                            writer.queue(SetForegroundColor(TermColor::Rgb {
                                r: color.r,
                                g: color.g,
                                b: color.b,
                            }))?;
                            current = Some(color);
                        }
                        writer.queue(Print(Self::glyph(color)))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: &Point2<f32>,
    v1: &Point2<f32>,
    v2: &Point2<f32>,
    p: &Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(points: [(f32, f32); 3], color: Color) -> DrawCommand {
        DrawCommand {
            points: points.map(|(x, y)| Point2::new(x, y)),
            color,
            depth: 0.0,
        }
    }

    #[test]
    fn test_fill_covers_interior_cells() {
        let mut renderer = AsciiRenderer::new(10, 5);
        // Lower-left half of the grid; viewport rows are twice the cell rows
        renderer.fill_polygon(&command([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], Color::WHITE));
        assert_eq!(renderer.cell(0, 0), Some(Color::WHITE));
        assert_eq!(renderer.cell(4, 2), Some(Color::WHITE));
        assert_eq!(renderer.cell(9, 4), None);
    }

    #[test]
    fn test_later_polygons_paint_over_earlier() {
        let mut renderer = AsciiRenderer::new(4, 2);
        let full = [(0.0, 0.0), (16.0, 0.0), (0.0, 16.0)];
        let list = DrawList {
            commands: vec![command(full, Color::gray(40)), command(full, Color::gray(200))],
            ..DrawList::default()
        };
        renderer.fill_draw_list(&list);
        assert_eq!(renderer.cell(0, 0), Some(Color::gray(200)));
    }

    #[test]
    fn test_either_winding_fills() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.fill_polygon(&command([(0.0, 0.0), (0.0, 16.0), (16.0, 0.0)], Color::WHITE));
        assert_eq!(renderer.cell(1, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_glyph_ramp_and_text() {
        let mut renderer = AsciiRenderer::new(2, 1);
        renderer.fill_polygon(&command([(0.0, 0.0), (1.5, 0.0), (0.0, 3.0)], Color::WHITE));
        assert_eq!(renderer.to_text(), "@ \n");
        assert_eq!(AsciiRenderer::glyph(Color::BLACK), '.');
        renderer.clear();
        assert_eq!(renderer.to_text(), "  \n");
    }

    #[test]
    fn test_viewport_size_doubles_rows() {
        assert_eq!(AsciiRenderer::new(80, 24).viewport_size(), (80, 48));
    }
}
