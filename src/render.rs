// Copyright (c) 2026 rezky_nightky

use std::io;

use crossterm::style::Color;

use crate::{
    color::{blend, terminal_color, ColorMode, Hsl},
    config::ColorBg,
    frame::{Frame, Glyph},
    grid::Grid,
    terminal::Terminal,
};

const BLACK: (u8, u8, u8) = (0, 0, 0);
const SHADES_UTF: [char; 4] = ['░', '▒', '▓', '█'];
const SHADES_ASCII: [char; 5] = ['.', ':', '+', '#', '@'];

/// What one grid position looks like. Empty cells are fully transparent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualCell {
    pub background: Option<Hsl>,
    pub opacity: f32,
}

impl VisualCell {
    #[allow(dead_code)]
    pub fn css_background(&self) -> String {
        match self.background {
            Some(c) => c.to_string(),
            None => "transparent".to_string(),
        }
    }
}

/// `(row, col, cell)` for every grid position, row-major.
pub fn project(grid: &Grid) -> impl Iterator<Item = (u16, u16, VisualCell)> + '_ {
    let cols = grid.cols().max(1) as usize;
    grid.cells().iter().enumerate().map(move |(i, cell)| {
        let visual = match cell {
            Some(seg) => VisualCell {
                background: Some(seg.color),
                opacity: seg.opacity,
            },
            None => VisualCell {
                background: None,
                opacity: 0.0,
            },
        };
        ((i / cols) as u16, (i % cols) as u16, visual)
    })
}

/// Read-only consumer of committed grid snapshots.
pub trait Renderer {
    fn render(&mut self, grid: &Grid) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    pub color_mode: ColorMode,
    pub color_bg: ColorBg,
    /// Terminal columns per grid cell.
    pub cell_width: u16,
    /// Use the ASCII shading ramp in mono mode.
    pub ascii: bool,
}

impl RenderStyle {
    pub fn empty_bg(&self) -> Option<Color> {
        match self.color_bg {
            ColorBg::Black => terminal_color(self.color_mode, BLACK),
            ColorBg::DefaultBackground => None,
        }
    }

    fn glyph(&self, cell: VisualCell) -> Glyph {
        let Some(color) = cell.background else {
            return Glyph::blank_with_bg(self.empty_bg());
        };
        if self.color_mode == ColorMode::Mono {
            return Glyph {
                ch: shade(cell.opacity, self.ascii),
                fg: None,
                bg: None,
            };
        }
        let rgb = blend(color.to_rgb(), cell.opacity, BLACK);
        Glyph {
            ch: ' ',
            fg: None,
            bg: terminal_color(self.color_mode, rgb),
        }
    }
}

fn shade(opacity: f32, ascii: bool) -> char {
    let ramp: &[char] = if ascii { &SHADES_ASCII } else { &SHADES_UTF };
    let level = (opacity.clamp(0.0, 1.0) * ramp.len() as f32).round() as usize;
    ramp[level.clamp(1, ramp.len()) - 1]
}

/// Projects `grid` into `frame`, centered and clipped.
pub fn paint(frame: &mut Frame, grid: &Grid, style: &RenderStyle) {
    let cw = style.cell_width.max(1) as u32;
    let x0 = (frame.width as u32).saturating_sub(grid.cols() as u32 * cw) / 2;
    let y0 = (frame.height as u32).saturating_sub(grid.rows() as u32) / 2;

    for (row, col, cell) in project(grid) {
        let glyph = style.glyph(cell);
        let Ok(y) = u16::try_from(y0 + row as u32) else {
            continue;
        };
        let left = x0 + col as u32 * cw;
        for x in left..left + cw {
            if let Ok(x) = u16::try_from(x) {
                frame.set(x, y, glyph);
            }
        }
    }
}

pub struct TerminalRenderer {
    term: Terminal,
    frame: Frame,
    style: RenderStyle,
}

impl TerminalRenderer {
    pub fn new(style: RenderStyle) -> io::Result<Self> {
        let term = Terminal::new()?;
        let (w, h) = term.size()?;
        Ok(Self {
            term,
            frame: Frame::new(w, h, style.empty_bg()),
            style,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.frame.width, self.frame.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.frame = Frame::new(width, height, self.style.empty_bg());
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, grid: &Grid) -> io::Result<()> {
        paint(&mut self.frame, grid, &self.style);
        self.term.draw(&mut self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Segment;

    fn style(color_mode: ColorMode, color_bg: ColorBg) -> RenderStyle {
        RenderStyle {
            color_mode,
            color_bg,
            cell_width: 2,
            ascii: false,
        }
    }

    fn lit_grid() -> Grid {
        let mut g = Grid::new(2, 3);
        g.set(
            1,
            2,
            Some(Segment {
                color: Hsl::new(120, 100, 50),
                opacity: 0.6,
            }),
        );
        g
    }

    #[test]
    fn project_is_row_major_and_transparent_when_empty() {
        let cells: Vec<_> = project(&lit_grid()).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!((cells[5].0, cells[5].1), (1, 2));
        assert_eq!(cells[5].2.css_background(), "hsl(120, 100%, 50%)");
        assert!((cells[5].2.opacity - 0.6).abs() < 1e-6);
        assert_eq!(cells[0].2.css_background(), "transparent");
        assert_eq!(cells[0].2.opacity, 0.0);
    }

    #[test]
    fn paint_centers_grid_and_widens_cells() {
        let mut frame = Frame::new(10, 4, None);
        paint(&mut frame, &lit_grid(), &style(ColorMode::TrueColor, ColorBg::Black));

        // 3 cols * 2 wide = 6 of 10 -> x0 = 2; 2 rows of 4 -> y0 = 1.
        let want = Some(Color::Rgb { r: 0, g: 153, b: 0 });
        assert_eq!(frame.get(6, 2).unwrap().bg, want);
        assert_eq!(frame.get(7, 2).unwrap().bg, want);
        assert_eq!(frame.get(2, 1).unwrap().bg, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
        assert_eq!(frame.get(0, 0).unwrap().bg, None);
    }

    #[test]
    fn default_background_leaves_empty_cells_unset() {
        let mut frame = Frame::new(6, 2, Some(Color::Red));
        paint(
            &mut frame,
            &Grid::new(2, 3),
            &style(ColorMode::Color256, ColorBg::DefaultBackground),
        );
        assert!((0..6).all(|x| frame.get(x, 0).unwrap().bg.is_none()));
    }

    #[test]
    fn mono_uses_shading_ramp() {
        let mut frame = Frame::new(6, 2, None);
        paint(&mut frame, &lit_grid(), &style(ColorMode::Mono, ColorBg::Black));
        assert_eq!(frame.get(4, 1).unwrap().ch, '▒');
        assert_eq!(frame.get(0, 0).unwrap().ch, ' ');

        let ramp: String = [0.2, 0.4, 0.6, 0.8, 1.0]
            .iter()
            .map(|&o| shade(o, true))
            .collect();
        assert_eq!(ramp, ".:+#@");
    }

    #[test]
    fn oversized_grid_is_clipped() {
        let mut frame = Frame::new(4, 1, None);
        let mut g = Grid::new(3, 5);
        g.set(
            0,
            1,
            Some(Segment {
                color: Hsl::new(0, 100, 50),
                opacity: 1.0,
            }),
        );
        paint(&mut frame, &g, &style(ColorMode::TrueColor, ColorBg::Black));
        assert_eq!(frame.get(2, 0).unwrap().bg, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
    }
}
