//! Measurement service
//!
//! The layout engine never touches fonts or files. It asks a `Measure`
//! backend for a rasterized visual and its pixel size, given a text run, a
//! special glyph, or an image path.

use crate::config::{BlockFontConfig, DEFAULT_CONTOUR_INTEGRAL_IMAGE, DEFAULT_INTEGRAL_IMAGE};
use crate::error::MeasureError;
use crate::raster::{Bitmap, Point, Rect, MAX_EXTENT};
use crate::symbols::SpecialGlyph;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

/// A rasterized visual with its dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measured {
    pub bitmap: Bitmap,
    pub width: u32,
    pub height: u32,
}

impl Measured {
    /// Wrap a bitmap, taking its size as the measured size
    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width(),
            height: bitmap.height(),
            bitmap,
        }
    }
}

/// A text and image rasterizer.
///
/// Implementations must behave as pure functions of their input: measuring the
/// same text twice yields the same dimensions.
pub trait Measure {
    /// Rasterize a run of text
    fn measure_text(&self, text: &str) -> Result<Measured, MeasureError>;

    /// Rasterize a single special glyph
    fn measure_glyph(&self, glyph: SpecialGlyph) -> Result<Measured, MeasureError>;

    /// Load a fixed image asset
    fn load_image(&self, path: &Path) -> Result<Measured, MeasureError>;
}

// =============================================================================
// Block Font
// =============================================================================

/// Fixed-cell backend: every grapheme is one cell drawn as an outlined box.
///
/// Images are served from an in-memory registry seeded with integral signs.
pub struct BlockFont {
    config: BlockFontConfig,
    images: HashMap<PathBuf, Bitmap>,
}

impl BlockFont {
    /// Create with default cell metrics and the built-in integral images
    pub fn new() -> Self {
        Self::with_config(BlockFontConfig::default())
    }

    /// Create with specific cell metrics
    pub fn with_config(config: BlockFontConfig) -> Self {
        let mut images = HashMap::new();
        images.insert(PathBuf::from(DEFAULT_INTEGRAL_IMAGE), integral_sign(false));
        images.insert(
            PathBuf::from(DEFAULT_CONTOUR_INTEGRAL_IMAGE),
            integral_sign(true),
        );
        Self { config, images }
    }

    /// Make an image available to `load_image`
    pub fn register_image(&mut self, path: impl Into<PathBuf>, bitmap: Bitmap) {
        self.images.insert(path.into(), bitmap);
    }

    /// Bitmap size for a run of `cells` cells
    fn run_size(&self, cells: usize) -> Result<(u32, u32), MeasureError> {
        let height = self.config.cell_height;
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(self.config.cell_width))
            .filter(|&width| width <= MAX_EXTENT && height <= MAX_EXTENT)
            .map(|width| (width, height))
            .ok_or(MeasureError::TooLarge { limit: MAX_EXTENT })
    }

    /// Outline one cell starting at `x`
    fn draw_cell(&self, bitmap: &mut Bitmap, x: i32) -> Option<Rect> {
        let inset = self.config.glyph_inset;
        let w = self.config.cell_width.checked_sub(inset.saturating_mul(2))?;
        let h = self.config.cell_height.checked_sub(inset.saturating_mul(2))?;
        if w == 0 || h == 0 {
            return None;
        }
        let cell = Rect::new(x + inset as i32, inset as i32, w, h);
        let (l, t, r, b) = (cell.x, cell.y, cell.right() - 1, cell.bottom() - 1);
        bitmap.draw_line(Point::new(l, t), Point::new(r, t));
        bitmap.draw_line(Point::new(r, t), Point::new(r, b));
        bitmap.draw_line(Point::new(r, b), Point::new(l, b));
        bitmap.draw_line(Point::new(l, b), Point::new(l, t));
        Some(cell)
    }
}

impl Default for BlockFont {
    fn default() -> Self {
        Self::new()
    }
}

impl Measure for BlockFont {
    fn measure_text(&self, text: &str) -> Result<Measured, MeasureError> {
        let graphemes: Vec<&str> = text.graphemes(true).collect();
        let (width, height) = self.run_size(graphemes.len())?;
        let mut bitmap = Bitmap::new(width, height);

        for (i, grapheme) in graphemes.iter().enumerate() {
            if grapheme.chars().all(char::is_whitespace) {
                continue;
            }
            self.draw_cell(&mut bitmap, (i as u32 * self.config.cell_width) as i32);
        }

        Ok(Measured::from_bitmap(bitmap))
    }

    fn measure_glyph(&self, glyph: SpecialGlyph) -> Result<Measured, MeasureError> {
        let (width, height) = self.run_size(1)?;
        let mut bitmap = Bitmap::new(width, height);
        // Special glyphs get a diagonal so they read differently from text
        if let Some(cell) = self.draw_cell(&mut bitmap, 0) {
            bitmap.draw_line(
                Point::new(cell.x, cell.bottom() - 1),
                Point::new(cell.right() - 1, cell.y),
            );
        }
        tracing::trace!(glyph = glyph.name(), "measured glyph");
        Ok(Measured::from_bitmap(bitmap))
    }

    fn load_image(&self, path: &Path) -> Result<Measured, MeasureError> {
        self.images
            .get(path)
            .cloned()
            .map(Measured::from_bitmap)
            .ok_or_else(|| MeasureError::ImageNotFound(path.to_path_buf()))
    }
}

/// Procedural 12x24 integral sign, optionally with a contour ring
fn integral_sign(contour: bool) -> Bitmap {
    let mut bitmap = Bitmap::new(12, 24);
    let path = [(10, 1), (8, 0), (6, 2), (5, 21), (3, 23), (1, 22)];
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        bitmap.draw_line(Point::new(a.0, a.1), Point::new(b.0, b.1));
    }
    if contour {
        let ring = [(3, 9), (8, 9), (8, 14), (3, 14), (3, 9)];
        for pair in ring.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            bitmap.draw_line(Point::new(a.0, a.1), Point::new(b.0, b.1));
        }
    }
    bitmap
}
