//! Plain-ASCII glyph grid.
//!
//! Each cell holds one character. Lines pick a glyph from their slope, and
//! crossing strokes merge: `-` over `|` becomes `+`, `/` over `\` becomes `X`.

/// Glyph class of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Horizontal,
    Vertical,
    Rising,
    Falling,
    Heavy,
}

impl Stroke {
    /// Classify the stroke direction of a line in screen coordinates (y down).
    /// Slopes flatter than 1:4 count as horizontal or vertical.
    #[must_use]
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        let (ax, ay) = (dx.abs(), dy.abs());
        if ay * 4.0 <= ax {
            Self::Horizontal
        } else if ax * 4.0 <= ay {
            Self::Vertical
        } else if (dx > 0.0) == (dy > 0.0) {
            Self::Falling
        } else {
            Self::Rising
        }
    }

    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(self, Self::Rising | Self::Falling)
    }

    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Horizontal => '-',
            Self::Vertical => '|',
            Self::Rising => '/',
            Self::Falling => '\\',
            Self::Heavy => '=',
        }
    }
}

/// Combine the glyph already in a cell with a new one. Dots survive the barre.
#[must_use]
pub fn merge_glyph(existing: char, incoming: char) -> char {
    match (existing, incoming) {
        (' ', new) => new,
        (dot @ ('@' | 'o'), '=') => dot,
        ('-', '|') | ('|', '-') | ('+', '-' | '|') => '+',
        ('/', '\\') | ('\\', '/') => 'X',
        ('=', _) | (_, '=') => '=',
        (_, new) => new,
    }
}

#[derive(Debug, Clone)]
pub struct GlyphGrid {
    cells: Vec<char>,
    width: usize,
    height: usize,
}

impl GlyphGrid {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![' '; width.saturating_mul(height)],
            width,
            height,
        }
    }

    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn get(&self, x: isize, y: isize) -> Option<char> {
        self.index(x, y).map(|index| self.cells[index])
    }

    /// Merge `glyph` into a cell.
    pub fn stamp(&mut self, x: isize, y: isize, glyph: char) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = merge_glyph(self.cells[index], glyph);
        }
    }

    /// Overwrite a cell regardless of its content.
    pub fn put(&mut self, x: isize, y: isize, glyph: char) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = glyph;
        }
    }

    /// Bresenham line drawn with the given stroke glyph.
    pub fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, stroke: Stroke) {
        let glyph = stroke.glyph();
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.stamp(x, y, glyph);
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

    #[allow(clippy::cast_possible_wrap)]
    pub fn put_text(&mut self, x: isize, y: isize, text: &str) {
        for (offset, ch) in text.chars().enumerate() {
            self.put(x + offset as isize, y, ch);
        }
    }

    /// Rows joined by newlines with trailing spaces trimmed.
    #[must_use]
    pub fn render(&self) -> String {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}
