//! Sub-cell pixel canvas for terminal rendering.
//!
//! Braille packs 2x4 pixels into one cell, quarter blocks 2x2 and half
//! blocks 1x2. Text is kept in a per-cell overlay that wins over pixels.

use crate::config::RenderMode;

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<bool>,
    overlay: Vec<Option<char>>,
    pixel_width: usize,
    pixel_height: usize,
    cell_width: usize,
    cell_height: usize,
    mode: RenderMode,
}

impl Canvas {
    #[must_use]
    pub fn new(cell_width: usize, cell_height: usize, mode: RenderMode) -> Self {
        let (mult_x, mult_y) = mode.subcell_multiplier();
        let pixel_width = cell_width.saturating_mul(mult_x);
        let pixel_height = cell_height.saturating_mul(mult_y);

        Self {
            pixels: vec![false; pixel_width.saturating_mul(pixel_height)],
            overlay: vec![None; cell_width.saturating_mul(cell_height)],
            pixel_width,
            pixel_height,
            cell_width,
            cell_height,
            mode,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.overlay.fill(None);
    }

    #[must_use]
    pub const fn pixel_dimensions(&self) -> (usize, usize) {
        (self.pixel_width, self.pixel_height)
    }

    #[must_use]
    pub const fn cell_dimensions(&self) -> (usize, usize) {
        (self.cell_width, self.cell_height)
    }

    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Set a pixel; coordinates off the canvas are ignored.
    pub fn set_pixel(&mut self, x: isize, y: isize) {
        if let Some(index) = self.pixel_index(x, y) {
            self.pixels[index] = true;
        }
    }

    #[must_use]
    pub fn get_pixel(&self, x: isize, y: isize) -> bool {
        self.pixel_index(x, y)
            .is_some_and(|index| self.pixels[index])
    }

    /// Bresenham line from (x0, y0) to (x1, y1), both ends included.
    pub fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y);
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

    /// Midpoint circle outline.
    pub fn draw_circle(&mut self, cx: isize, cy: isize, radius: isize) {
        if radius <= 0 {
            self.set_pixel(cx, cy);
            return;
        }

        let mut x = radius;
        let mut y = 0_isize;
        let mut err = 1 - radius;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.set_pixel(px, py);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    pub fn fill_circle(&mut self, cx: isize, cy: isize, radius: isize) {
        if radius <= 0 {
            self.set_pixel(cx, cy);
            return;
        }
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy);
                }
            }
        }
    }

    /// Write `text` into the overlay starting at a cell. Clipped at the right edge.
    pub fn put_text(&mut self, cell_x: usize, cell_y: usize, text: &str) {
        if cell_y >= self.cell_height {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let x = cell_x + offset;
            if x >= self.cell_width {
                break;
            }
            self.overlay[cell_y * self.cell_width + x] = Some(ch);
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(self.cell_width * self.cell_height * 4);
        for cell_y in 0..self.cell_height {
            if cell_y > 0 {
                output.push('\n');
            }
            for cell_x in 0..self.cell_width {
                let ch = self.overlay[cell_y * self.cell_width + cell_x]
                    .unwrap_or_else(|| self.render_cell(cell_x, cell_y));
                output.push(ch);
            }
        }
        output
    }

    #[allow(clippy::cast_possible_wrap)]
    fn pixel(&self, x: usize, y: usize) -> bool {
        self.get_pixel(x as isize, y as isize)
    }

    fn render_cell(&self, cell_x: usize, cell_y: usize) -> char {
        match self.mode {
            RenderMode::Braille => self.render_braille_cell(cell_x, cell_y),
            RenderMode::Block => self.render_block_cell(cell_x, cell_y),
            RenderMode::HalfBlock => self.render_halfblock_cell(cell_x, cell_y),
            RenderMode::Ascii => {
                if self.pixel(cell_x, cell_y) {
                    '#'
                } else {
                    ' '
                }
            }
        }
    }

    fn render_braille_cell(&self, cell_x: usize, cell_y: usize) -> char {
        // dot bits, column-major: 0 3 / 1 4 / 2 5 / 6 7
        const DOTS: [(usize, usize, u32); 8] = [
            (0, 0, 0x01),
            (0, 1, 0x02),
            (0, 2, 0x04),
            (1, 0, 0x08),
            (1, 1, 0x10),
            (1, 2, 0x20),
            (0, 3, 0x40),
            (1, 3, 0x80),
        ];
        let (px, py) = (cell_x * 2, cell_y * 4);
        let code_point = DOTS
            .iter()
            .filter(|(dx, dy, _)| self.pixel(px + dx, py + dy))
            .fold(0x2800_u32, |code, (_, _, bit)| code | bit);
        char::from_u32(code_point).unwrap_or(' ')
    }

    fn render_block_cell(&self, cell_x: usize, cell_y: usize) -> char {
        let (px, py) = (cell_x * 2, cell_y * 2);
        match (
            self.pixel(px, py),
            self.pixel(px + 1, py),
            self.pixel(px, py + 1),
            self.pixel(px + 1, py + 1),
        ) {
            (false, false, false, false) => ' ',
            (true, false, false, false) => '▘',
            (false, true, false, false) => '▝',
            (true, true, false, false) => '▀',
            (false, false, true, false) => '▖',
            (true, false, true, false) => '▌',
            (false, true, true, false) => '▞',
            (true, true, true, false) => '▛',
            (false, false, false, true) => '▗',
            (true, false, false, true) => '▚',
            (false, true, false, true) => '▐',
            (true, true, false, true) => '▜',
            (false, false, true, true) => '▄',
            (true, false, true, true) => '▙',
            (false, true, true, true) => '▟',
            (true, true, true, true) => '█',
        }
    }

    fn render_halfblock_cell(&self, cell_x: usize, cell_y: usize) -> char {
        let py = cell_y * 2;
        match (self.pixel(cell_x, py), self.pixel(cell_x, py + 1)) {
            (false, false) => ' ',
            (true, false) => '▀',
            (false, true) => '▄',
            (true, true) => '█',
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn pixel_index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.pixel_width && y < self.pixel_height).then(|| y * self.pixel_width + x)
    }
}
