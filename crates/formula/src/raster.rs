//! Raster surface - Owned monochrome pixels behind every layout box
//!
//! A `Bitmap` is the visual handle the measurement backend hands to the layout
//! engine. Composite steps copy child pixels into a fresh bitmap and then drop
//! the children, so each visual has exactly one owner at a time.

use serde::{Deserialize, Serialize};

/// Coverage value for drawn pixels
pub const INK: u8 = 255;

/// Largest width or height of any box or visual
pub const MAX_EXTENT: u32 = 1 << 15;

// =============================================================================
// Geometry
// =============================================================================

/// An integer position; may be negative for partially clipped placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// =============================================================================
// Bitmap
// =============================================================================

/// A monochrome coverage buffer, row-major, one byte per pixel
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ink", &self.ink_count())
            .finish()
    }
}

impl Bitmap {
    /// A blank bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Coverage at a pixel; 0 outside the bitmap
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(0, |i| self.pixels[i])
    }

    /// Set a pixel; writes outside the bitmap are dropped
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = value;
        }
    }

    /// Fill a rectangle with ink, clipped to the bitmap
    pub fn fill_rect(&mut self, rect: Rect) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, INK);
            }
        }
    }

    /// Draw a one-pixel line between two points (inclusive), clipped
    pub fn draw_line(&mut self, from: Point, to: Point) {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (from.x, from.y);

        loop {
            self.set(x, y, INK);
            if x == to.x && y == to.y {
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

    /// Stretch `src` into `dst` with nearest-neighbour sampling.
    ///
    /// Ink is OR-ed so overlapping placements never erase each other.
    pub fn blit_scaled(&mut self, src: &Bitmap, dst: Rect) {
        if dst.is_empty() || src.width == 0 || src.height == 0 {
            return;
        }
        for dy in 0..dst.height {
            let ty = dst.y + dy as i32;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            let sy = (dy as u64 * src.height as u64 / dst.height as u64) as i32;
            for dx in 0..dst.width {
                let tx = dst.x + dx as i32;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                let sx = (dx as u64 * src.width as u64 / dst.width as u64) as i32;
                let value = src.get(sx, sy);
                if value != 0 {
                    let i = ty as usize * self.width as usize + tx as usize;
                    self.pixels[i] = self.pixels[i].max(value);
                }
            }
        }
    }

    /// Number of inked pixels
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Text preview, one character per pixel
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.push(if self.get(x, y) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}
