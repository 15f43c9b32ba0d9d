//! Text rendering of a frame, one character per column and row

use std::fmt;
use std::fmt::Write as _;

use super::frame::Frame;
use super::projector::{DrawCommand, HitCategory, colors};
use crate::cast::Side;

/// Wall glyphs from darkest to brightest
const WALL_RAMP: &[u8] = b":;=+x*X#%@";
/// Glyph for surfaces seen through a spent mirror chain
const OPAQUE_GLYPH: char = '~';
const HORIZON_GLYPH: char = '-';
const CEILING_GLYPH: char = ' ';
const FLOOR_GLYPH: char = '.';

/// A frame rasterized into rows of characters, each with its RGB colour
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiCanvas {
    width: usize,
    rows: Vec<Vec<char>>,
    tints: Vec<Vec<[f32; 3]>>,
}

impl AsciiCanvas {
    pub fn from_frame(frame: &Frame) -> Self {
        let width = frame.screen().width as usize;
        let height = frame.screen().height as usize;
        let horizon = height / 2;

        let mut rows: Vec<Vec<char>> = (0..height)
            .map(|row| {
                let fill = if row < horizon { CEILING_GLYPH } else { FLOOR_GLYPH };
                vec![fill; width]
            })
            .collect();
        let mut tints: Vec<Vec<[f32; 3]>> = (0..height)
            .map(|row| {
                let fill = if row < horizon { colors::CEILING } else { colors::FLOOR };
                vec![fill; width]
            })
            .collect();

        for cmd in frame.commands() {
            let glyph = glyph_for(cmd);
            let tint = cmd.color();
            let column = cmd.column as usize;
            let (top, bottom) = (cmd.top as usize, cmd.bottom as usize);
            for (row, tints) in rows.iter_mut().zip(tints.iter_mut()).take(bottom).skip(top) {
                row[column] = glyph;
                tints[column] = tint;
            }
        }

        Self { width, rows, tints }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// One row as a string
    pub fn row(&self, row: usize) -> Option<String> {
        self.rows.get(row).map(|r| r.iter().collect())
    }

    /// Colour of one character
    pub fn tint(&self, column: usize, row: usize) -> Option<[f32; 3]> {
        self.tints.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Rows with 24-bit ANSI colour codes, reset at the end of each line
    pub fn to_ansi(&self) -> String {
        let mut out = String::with_capacity(self.width * self.height() * 20 + self.height() * 5);
        for (row, tints) in self.rows.iter().zip(&self.tints) {
            for (&glyph, tint) in row.iter().zip(tints) {
                let [r, g, b] = tint.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
                // String writes can't fail
                let _ = write!(out, "\x1b[38;2;{r};{g};{b}m{glyph}");
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }
}

impl fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: String = row.iter().collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn glyph_for(cmd: &DrawCommand) -> char {
    match cmd.category {
        HitCategory::Void => CEILING_GLYPH,
        HitCategory::Opaque => OPAQUE_GLYPH,
        HitCategory::Horizon => HORIZON_GLYPH,
        HitCategory::Wall(_) => {
            let mut shade = cmd.shade;
            if cmd.side == Side::Y {
                shade *= colors::Y_SIDE_DIM as f64;
            }
            let last = WALL_RAMP.len() - 1;
            let i = (shade.clamp(0.0, 1.0) * last as f64).round() as usize;
            WALL_RAMP[i.min(last)] as char
        }
    }
}
