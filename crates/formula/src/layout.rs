//! Formula Layout - Turn a formula tree into sized, composited boxes
//!
//! Layout runs bottom-up. Each node's children are laid out first, then the
//! node composites them into one flat box: child pixels are copied into a
//! fresh bitmap and the child boxes are dropped. No unflattened result is ever
//! handed upward.

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::measure::{Measure, Measured};
use crate::model::Node;
use crate::parser::MAX_NESTING;
use crate::raster::{Bitmap, Point, Rect, MAX_EXTENT};
use crate::symbols::{self, SpecialGlyph};
use serde::Serialize;
use std::cell::Cell;
use std::path::Path;

/// Text substituted for empty identifiers and `Empty` nodes
const BLANK: &str = " ";

/// Label drawn by `\lim`
const LIM_LABEL: &str = "lim";

/// Arrowhead reach for `\vec`
const ARROW_HEAD: i32 = 4;

/// Deepest tree the parser can hand over: each nesting level adds at most a
/// function and a compound, plus the program root
pub const MAX_TREE_DEPTH: usize = 2 * MAX_NESTING + 1;

// =============================================================================
// Layout Box
// =============================================================================

/// A laid out node: its size and, when rasterizing, its pixels.
///
/// When present, the visual always has exactly the box's dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutBox {
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub visual: Option<Bitmap>,
}

impl LayoutBox {
    fn from_measured(measured: Measured, rasterize: bool) -> Result<Self, LayoutError> {
        let Measured {
            bitmap,
            width,
            height,
        } = measured;
        let (width, height) = extent(Some(width), Some(height))?;
        let visual = rasterize.then(|| {
            if bitmap.width() == width && bitmap.height() == height {
                bitmap
            } else {
                resample(&bitmap, width, height)
            }
        });
        Ok(Self {
            width,
            height,
            visual,
        })
    }

    /// Resize by `factor`, truncating each dimension; the visual is resampled
    pub fn scaled(self, factor: f32) -> Result<Self, LayoutError> {
        let (width, height) = extent(
            Some(scale(self.width, factor)),
            Some(scale(self.height, factor)),
        )?;
        let visual = self.visual.map(|bitmap| resample(&bitmap, width, height));
        Ok(Self {
            width,
            height,
            visual,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn scale(value: u32, factor: f32) -> u32 {
    (value as f32 * factor) as u32
}

/// Accept a box size only if nothing overflowed and both sides fit
fn extent(width: Option<u32>, height: Option<u32>) -> Result<(u32, u32), LayoutError> {
    match (width, height) {
        (Some(width), Some(height)) if width <= MAX_EXTENT && height <= MAX_EXTENT => {
            Ok((width, height))
        }
        _ => Err(LayoutError::TooLarge { limit: MAX_EXTENT }),
    }
}

fn sum(values: impl IntoIterator<Item = u32>) -> Option<u32> {
    values.into_iter().try_fold(0u32, u32::checked_add)
}

fn resample(bitmap: &Bitmap, width: u32, height: u32) -> Bitmap {
    let mut out = Bitmap::new(width, height);
    out.blit_scaled(bitmap, Rect::new(0, 0, width, height));
    out
}

/// Offset that centers `inner` within `outer`
fn center(outer: u32, inner: u32) -> i32 {
    (outer.saturating_sub(inner) / 2) as i32
}

// =============================================================================
// Composite
// =============================================================================

/// One composite step. Children are moved in and released after their pixels
/// are copied, whether or not the step completes.
struct Composite {
    width: u32,
    height: u32,
    canvas: Option<Bitmap>,
}

impl Composite {
    fn new(width: u32, height: u32, rasterize: bool) -> Self {
        Self {
            width,
            height,
            canvas: rasterize.then(|| Bitmap::new(width, height)),
        }
    }

    fn place(&mut self, child: LayoutBox, x: i32, y: i32) {
        if let (Some(canvas), Some(visual)) = (self.canvas.as_mut(), child.visual.as_ref()) {
            canvas.blit_scaled(visual, Rect::new(x, y, child.width, child.height));
        }
    }

    fn line(&mut self, from: Point, to: Point) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.draw_line(from, to);
        }
    }

    fn fill(&mut self, rect: Rect) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.fill_rect(rect);
        }
    }

    fn finish(self) -> LayoutBox {
        LayoutBox {
            width: self.width,
            height: self.height,
            visual: self.canvas,
        }
    }
}

// =============================================================================
// Layout Engine
// =============================================================================

/// Engine for computing formula layout against a measurement backend
pub struct LayoutEngine<'m> {
    measure: &'m dyn Measure,
    config: LayoutConfig,
    depth: Cell<usize>,
}

impl<'m> LayoutEngine<'m> {
    /// Create a new layout engine with default geometry
    pub fn new(measure: &'m dyn Measure) -> Self {
        Self::with_config(measure, LayoutConfig::default())
    }

    /// Create with specific geometry
    pub fn with_config(measure: &'m dyn Measure, config: LayoutConfig) -> Self {
        Self {
            measure,
            config,
            depth: Cell::new(0),
        }
    }

    /// Layout a formula tree and return its flattened root box
    pub fn layout(&self, node: &Node) -> Result<LayoutBox, LayoutError> {
        let root = self.layout_node(node).inspect_err(|err| {
            tracing::warn!(%err, "layout aborted");
        })?;
        tracing::debug!(width = root.width, height = root.height, "laid out formula");
        Ok(root)
    }

    fn layout_node(&self, node: &Node) -> Result<LayoutBox, LayoutError> {
        let depth = self.depth.get();
        if depth >= MAX_TREE_DEPTH {
            return Err(LayoutError::TooDeep {
                limit: MAX_TREE_DEPTH,
            });
        }
        self.depth.set(depth + 1);
        let result = match node {
            Node::Identifier { text } => self.layout_text(text),
            Node::Empty => self.layout_text(BLANK),
            Node::Compound { children } => self.layout_compound(children),
            Node::Function { name, args } => self.layout_function(name, args),
        };
        self.depth.set(depth);
        result
    }

    /// Start a composite step; `None` marks a size that overflowed
    fn composite(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Composite, LayoutError> {
        let (width, height) = extent(width, height)?;
        Ok(Composite::new(width, height, self.config.rasterize))
    }

    fn scaled(&self, node: &Node, factor: f32) -> Result<LayoutBox, LayoutError> {
        self.layout_node(node)?.scaled(factor)
    }

    /// Layout a text run; empty text becomes a single blank glyph
    fn layout_text(&self, text: &str) -> Result<LayoutBox, LayoutError> {
        let text = if text.is_empty() { BLANK } else { text };
        let measured = self.measure.measure_text(text)?;
        LayoutBox::from_measured(measured, self.config.rasterize)
    }

    fn layout_glyph(&self, glyph: SpecialGlyph) -> Result<LayoutBox, LayoutError> {
        let measured = self.measure.measure_glyph(glyph)?;
        LayoutBox::from_measured(measured, self.config.rasterize)
    }

    /// Children left to right, vertically centered, separated by a fixed gap
    fn layout_compound(&self, children: &[Node]) -> Result<LayoutBox, LayoutError> {
        let boxes = children
            .iter()
            .map(|child| self.layout_node(child))
            .collect::<Result<Vec<_>, _>>()?;

        let gap = self.config.compound_gap;
        let gaps = u32::try_from(boxes.len().saturating_sub(1))
            .ok()
            .and_then(|count| count.checked_mul(gap));
        let width = gaps.and_then(|gaps| sum(boxes.iter().map(|b| b.width).chain([gaps])));
        let height = boxes.iter().map(|b| b.height).max().unwrap_or(0);

        let mut composite = self.composite(width, Some(height))?;
        let mut x = 0u32;
        for child in boxes {
            let (advance, y) = (child.width, center(height, child.height));
            composite.place(child, x as i32, y);
            x = x.saturating_add(advance).saturating_add(gap);
        }
        Ok(composite.finish())
    }

    /// Dispatch a function node to its construct rule
    fn layout_function(&self, name: &str, args: &[Node]) -> Result<LayoutBox, LayoutError> {
        tracing::trace!(function = name, "layout function");
        match name {
            symbols::FRAC => {
                let [top, bottom] = expect_args::<2>(name, args)?;
                self.layout_fraction(top, bottom)
            }
            symbols::SUPERSCRIPT => {
                let [base, exponent] = expect_args::<2>(name, args)?;
                self.layout_superscript(base, exponent)
            }
            symbols::SUBSCRIPT => {
                let [base, sub] = expect_args::<2>(name, args)?;
                self.layout_subscript(base, sub)
            }
            symbols::SUM => {
                let [lower, upper] = expect_args::<2>(name, args)?;
                self.layout_sum(lower, upper)
            }
            symbols::LIM => {
                let [body] = expect_args::<1>(name, args)?;
                self.layout_limit(body)
            }
            symbols::SQRT => {
                let [term] = expect_args::<1>(name, args)?;
                self.layout_radical(term)
            }
            symbols::VEC => {
                let [term] = expect_args::<1>(name, args)?;
                self.layout_vector(term)
            }
            symbols::INT => {
                let [] = expect_args::<0>(name, args)?;
                self.layout_integral(&self.config.integral_image)
            }
            symbols::OINT => {
                let [] = expect_args::<0>(name, args)?;
                self.layout_integral(&self.config.contour_integral_image)
            }
            _ => match SpecialGlyph::from_name(name) {
                Some(glyph) => {
                    let [] = expect_args::<0>(name, args)?;
                    self.layout_glyph(glyph)
                }
                None => Err(LayoutError::UnknownFunction(name.to_string())),
            },
        }
    }

    /// Numerator over denominator, both at half size, with a divider between
    fn layout_fraction(&self, top: &Node, bottom: &Node) -> Result<LayoutBox, LayoutError> {
        let top = self.scaled(top, self.config.fraction_scale)?;
        let bottom = self.scaled(bottom, self.config.fraction_scale)?;

        let gap = self.config.fraction_gap;
        let width = top.width.max(bottom.width);
        let top_height = top.height;
        let height = sum([top.height, bottom.height, gap]);

        let mut composite = self.composite(Some(width), height)?;
        let height = composite.height;
        let (top_x, bottom_x) = (center(width, top.width), center(width, bottom.width));
        composite.place(top, top_x, 0);
        composite.place(bottom, bottom_x, (top_height + gap) as i32);
        let rule_y = top_height.saturating_add(self.config.fraction_rule_offset).min(height);
        composite.fill(Rect::new(
            0,
            rule_y as i32,
            width,
            self.config.fraction_rule_thickness.min(height - rule_y),
        ));
        Ok(composite.finish())
    }

    /// Half-size exponent in the base's top-right corner
    fn layout_superscript(&self, base: &Node, exponent: &Node) -> Result<LayoutBox, LayoutError> {
        let base = self.layout_node(base)?;
        let exponent = self.scaled(exponent, self.config.script_scale)?;

        let base_width = base.width;
        let width = base.width.checked_add(exponent.width);
        let mut composite = self.composite(width, Some(base.height))?;
        composite.place(base, 0, 0);
        composite.place(exponent, base_width as i32, 0);
        Ok(composite.finish())
    }

    /// Half-size subscript aligned to the base's bottom-right
    fn layout_subscript(&self, base: &Node, sub: &Node) -> Result<LayoutBox, LayoutError> {
        let base = self.layout_node(base)?;
        let sub = self.scaled(sub, self.config.script_scale)?;

        let (base_width, base_height) = base.size();
        let sub_y = base_height as i32 - sub.height as i32;
        let width = base.width.checked_add(sub.width);
        let mut composite = self.composite(width, Some(base_height))?;
        composite.place(base, 0, 0);
        composite.place(sub, base_width as i32, sub_y);
        Ok(composite.finish())
    }

    /// Upper limit, sigma, lower limit stacked and centered
    fn layout_sum(&self, lower: &Node, upper: &Node) -> Result<LayoutBox, LayoutError> {
        let lower = self.scaled(lower, self.config.sum_scale)?;
        let upper = self.scaled(upper, self.config.sum_scale)?;

        let sigma = self.config.sigma_size;
        let width = sigma.max(lower.width).max(upper.width);
        let upper_height = upper.height;
        let height = sum([sigma, lower.height, upper.height]);

        let mut composite = self.composite(Some(width), height)?;
        let (upper_x, lower_x) = (center(width, upper.width), center(width, lower.width));
        composite.place(upper, upper_x, 0);
        composite.place(lower, lower_x, (upper_height + sigma) as i32);
        draw_sigma(
            &mut composite,
            Rect::new(center(width, sigma), upper_height as i32, sigma, sigma),
        );
        Ok(composite.finish())
    }

    /// Fixed integral image at double size
    fn layout_integral(&self, path: &Path) -> Result<LayoutBox, LayoutError> {
        let measured = self.measure.load_image(path)?;
        LayoutBox::from_measured(measured, self.config.rasterize)?
            .scaled(self.config.integral_scale)
    }

    /// "lim" label with the body tucked under its lower half
    fn layout_limit(&self, body: &Node) -> Result<LayoutBox, LayoutError> {
        let label = self.layout_text(LIM_LABEL)?.scaled(self.config.lim_label_scale)?;
        let body = self.scaled(body, self.config.lim_body_scale)?;

        let body_y = label.height as i32 - (body.height / 2) as i32;
        let width = label.width.max(body.width);
        let height = (label.height as i32).max(body_y + body.height as i32).max(0) as u32;

        let mut composite = self.composite(Some(width), Some(height))?;
        let (label_x, body_x) = (center(width, label.width), center(width, body.width));
        composite.place(label, label_x, 0);
        composite.place(body, body_x, body_y);
        Ok(composite.finish())
    }

    /// Term with a rightward arrow drawn over its top edge
    fn layout_vector(&self, term: &Node) -> Result<LayoutBox, LayoutError> {
        let term = self.layout_node(term)?;
        let (width, height) = term.size();

        let mut composite = self.composite(Some(width), Some(height))?;
        composite.place(term, 0, 0);

        if width > 0 {
            let right = width as i32 - 1;
            let shaft = if height as i32 > ARROW_HEAD * 3 { ARROW_HEAD } else { 0 };
            composite.line(Point::new(0, shaft), Point::new(right, shaft));
            composite.line(Point::new(0, shaft + 1), Point::new(right, shaft + 1));
            composite.line(
                Point::new(right, shaft),
                Point::new(right - ARROW_HEAD, shaft - ARROW_HEAD),
            );
            composite.line(
                Point::new(right, shaft + 1),
                Point::new(right - ARROW_HEAD, shaft + 1 + ARROW_HEAD),
            );
        }
        Ok(composite.finish())
    }

    /// Term shifted right, under a radical stroke
    fn layout_radical(&self, term: &Node) -> Result<LayoutBox, LayoutError> {
        let term = self.layout_node(term)?;
        let offset = self.config.radical_offset;
        let (width, height) = (term.width.checked_add(offset), term.height);

        let mut composite = self.composite(width, Some(height))?;
        let width = composite.width;
        composite.place(term, offset as i32, 0);

        if offset > 0 && height > 0 {
            let bar_x = offset as i32 - 1;
            let bottom = height as i32 - 1;
            composite.line(Point::new(0, bottom / 2), Point::new(bar_x, bottom));
            composite.line(Point::new(bar_x, bottom), Point::new(bar_x, 0));
            composite.line(Point::new(bar_x, 0), Point::new(width as i32 - 1, 0));
        }
        Ok(composite.finish())
    }
}

/// Borrow exactly `N` arguments or report an arity mismatch
fn expect_args<'n, const N: usize>(
    name: &str,
    args: &'n [Node],
) -> Result<&'n [Node; N], LayoutError> {
    args.try_into().map_err(|_| LayoutError::Arity {
        name: name.to_string(),
        expected: N,
        found: args.len(),
    })
}

/// Stroke a capital sigma inside `region`
fn draw_sigma(composite: &mut Composite, region: Rect) {
    let pad = region.width as i32 / 10;
    let left = region.x + pad;
    let right = region.right() - 1 - pad;
    let top = region.y + pad;
    let bottom = region.bottom() - 1 - pad;
    let middle_x = region.x + region.width as i32 / 2;
    let middle_y = region.y + region.height as i32 / 2;

    composite.fill(Rect::new(left, top, (right - left + 1).max(0) as u32, 2));
    composite.fill(Rect::new(left, bottom - 1, (right - left + 1).max(0) as u32, 2));
    composite.line(Point::new(left, top), Point::new(middle_x, middle_y));
    composite.line(Point::new(middle_x, middle_y), Point::new(left, bottom));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::measure::BlockFont;
    use crate::parser::parse;
    use std::ops::Range;

    fn layout(source: &str) -> LayoutBox {
        let font = BlockFont::new();
        let engine = LayoutEngine::new(&font);
        engine.layout(&parse(source).unwrap()).unwrap()
    }

    /// Fully inked 20x32 cells, so every placed box shows up as a solid rectangle
    struct SolidFont;

    fn solid(width: u32, height: u32) -> Measured {
        let mut bitmap = Bitmap::new(width, height);
        bitmap.fill_rect(Rect::new(0, 0, width, height));
        Measured::from_bitmap(bitmap)
    }

    impl Measure for SolidFont {
        fn measure_text(&self, text: &str) -> Result<Measured, MeasureError> {
            Ok(solid(text.chars().count() as u32 * 20, 32))
        }

        fn measure_glyph(&self, _glyph: SpecialGlyph) -> Result<Measured, MeasureError> {
            Ok(solid(20, 32))
        }

        fn load_image(&self, path: &Path) -> Result<Measured, MeasureError> {
            Err(MeasureError::ImageNotFound(path.to_path_buf()))
        }
    }

    fn layout_solid(source: &str) -> Bitmap {
        let engine = LayoutEngine::new(&SolidFont);
        engine.layout(&parse(source).unwrap()).unwrap().visual.unwrap()
    }

    fn inked(visual: &Bitmap, xs: Range<i32>, mut ys: Range<i32>) -> bool {
        ys.all(|y| xs.clone().all(|x| visual.get(x, y) != 0))
    }

    fn blank(visual: &Bitmap, xs: Range<i32>, mut ys: Range<i32>) -> bool {
        ys.all(|y| xs.clone().all(|x| visual.get(x, y) == 0))
    }

    fn layout_node(node: &Node) -> Result<LayoutBox, LayoutError> {
        let font = BlockFont::new();
        LayoutEngine::new(&font).layout(node)
    }

    #[test]
    fn test_layout_identifier() {
        let b = layout("a");
        assert_eq!(b.size(), (20, 32));
        let visual = b.visual.unwrap();
        assert_eq!((visual.width(), visual.height()), (20, 32));
    }

    #[test]
    fn test_layout_empty_is_blank_glyph() {
        let b = layout("{}");
        assert_eq!(b.size(), (20, 32));
        assert_eq!(b.visual.unwrap().ink_count(), 0);
        assert_eq!(layout_node(&Node::identifier("")).unwrap().size(), (20, 32));
    }

    #[test]
    fn test_layout_compound_gap() {
        let b = layout("a bc");
        assert_eq!(b.size(), (20 + 10 + 40, 32));
    }

    #[test]
    fn test_layout_compound_centers_children() {
        // frac is 16 + 16 + 5 tall, taller than the identifier
        let b = layout("a \\frac{b}{c}");
        assert_eq!(b.size(), (20 + 10 + 10, 37));
    }

    #[test]
    fn test_layout_fraction() {
        let b = layout("\\frac{a}{bcd}");
        assert_eq!(b.size(), (30, 16 + 16 + 5));
        let visual = b.visual.unwrap();
        // divider at y = 16 + 2, two pixels thick, full width
        for x in 0..30 {
            assert_ne!(visual.get(x, 18), 0);
            assert_ne!(visual.get(x, 19), 0);
        }
    }

    #[test]
    fn test_fraction_placement() {
        // numerator 10x16 centered over a 30x16 denominator
        let visual = layout_solid("\\frac{a}{bcd}");
        assert_eq!((visual.width(), visual.height()), (30, 37));
        assert!(blank(&visual, 0..10, 0..16));
        assert!(inked(&visual, 10..20, 0..16));
        assert!(blank(&visual, 20..30, 0..16));
        assert!(blank(&visual, 0..30, 16..18));
        assert!(inked(&visual, 0..30, 18..20));
        assert!(blank(&visual, 0..30, 20..21));
        assert!(inked(&visual, 0..30, 21..37));

        let visual = layout_solid("\\frac{abc}{d}");
        assert!(inked(&visual, 0..30, 0..16));
        assert!(blank(&visual, 0..10, 21..37));
        assert!(inked(&visual, 10..20, 21..37));
        assert!(blank(&visual, 20..30, 21..37));
    }

    #[test]
    fn test_layout_superscript() {
        let b = layout("x^2");
        assert_eq!(b.size(), (20 + 10, 32));
    }

    #[test]
    fn test_superscript_placement() {
        let visual = layout_solid("x^2");
        assert!(inked(&visual, 0..20, 0..32));
        assert!(inked(&visual, 20..30, 0..16));
        assert!(blank(&visual, 20..30, 16..32));
    }

    #[test]
    fn test_subscript_placement() {
        let visual = layout_solid("x_i");
        assert!(inked(&visual, 0..20, 0..32));
        assert!(blank(&visual, 20..30, 0..16));
        assert!(inked(&visual, 20..30, 16..32));
    }

    #[test]
    fn test_layout_subscript() {
        let b = layout("x_i");
        assert_eq!(b.size(), (30, 32));
        let visual = b.visual.unwrap();
        // the subscript sits in the lower half
        assert!((16..32).any(|y| (20..30).any(|x| visual.get(x, y) != 0)));
        assert!((0..16).all(|y| (20..30).all(|x| visual.get(x, y) == 0)));
    }

    #[test]
    fn test_layout_sum() {
        let b = layout("\\sum{i=0}{n}");
        // lower: 3 cells at half size = 30x16, upper: 10x16
        assert_eq!(b.size(), (70, 70 + 16 + 16));
    }

    #[test]
    fn test_sum_placement() {
        // upper 10x16 and lower 30x16 centered on the 70 wide sigma column
        let visual = layout_solid("\\sum{i=0}{n}");
        assert_eq!((visual.width(), visual.height()), (70, 102));
        assert!(blank(&visual, 0..30, 0..16));
        assert!(inked(&visual, 30..40, 0..16));
        assert!(blank(&visual, 40..70, 0..16));
        assert!(blank(&visual, 0..20, 86..102));
        assert!(inked(&visual, 20..50, 86..102));
        assert!(blank(&visual, 50..70, 86..102));
        // sigma strokes stay inside the square between the limits
        assert!(!blank(&visual, 0..70, 16..86));
        assert!(blank(&visual, 0..70, 16..23));
        assert!(blank(&visual, 0..70, 79..86));
    }

    #[test]
    fn test_layout_sum_wide_limits() {
        let b = layout("\\sum{abcdefghij}{n}");
        assert_eq!(b.size(), (100, 102));
    }

    #[test]
    fn test_layout_integrals() {
        assert_eq!(layout("\\int").size(), (24, 48));
        let b = layout("\\oint");
        assert_eq!(b.size(), (24, 48));
        assert!(b.visual.unwrap().ink_count() > 0);
    }

    #[test]
    fn test_layout_limit() {
        let b = layout("\\lim{x}");
        // label 60x32 -> 36x19, body 20x32 -> 8x12, body_y = 19 - 6
        assert_eq!(b.size(), (36, 25));
    }

    #[test]
    fn test_limit_placement() {
        // label 36x19 on top, body 8x12 centered from y = 19 - 12 / 2
        let visual = layout_solid("\\lim{x}");
        assert_eq!((visual.width(), visual.height()), (36, 25));
        assert!(inked(&visual, 0..36, 0..19));
        assert!(blank(&visual, 0..14, 19..25));
        assert!(inked(&visual, 14..22, 19..25));
        assert!(blank(&visual, 22..36, 19..25));
    }

    #[test]
    fn test_layout_vector_keeps_size() {
        let b = layout("\\vec{ab}");
        assert_eq!(b.size(), (40, 32));
        let visual = b.visual.unwrap();
        assert!((0..40).all(|x| visual.get(x, ARROW_HEAD) != 0));
    }

    #[test]
    fn test_layout_radical() {
        let b = layout("\\sqrt{x}");
        assert_eq!(b.size(), (30, 32));
        let visual = b.visual.unwrap();
        assert!((9..30).all(|x| visual.get(x, 0) != 0));
    }

    #[test]
    fn test_layout_glyph() {
        assert_eq!(layout("\\pi").size(), (20, 32));
    }

    #[test]
    fn test_unknown_function_is_error() {
        let err = layout_node(&parse("\\zzz{}").unwrap()).unwrap_err();
        assert_eq!(err, LayoutError::UnknownFunction("zzz".to_string()));
    }

    #[test]
    fn test_unknown_function_nested() {
        let err = layout_node(&parse("\\frac{a}{\\sqrt{\\nope}}").unwrap()).unwrap_err();
        assert_eq!(err, LayoutError::UnknownFunction("nope".to_string()));
    }

    #[test]
    fn test_arity_mismatch_is_error() {
        let node = Node::function("frac", vec![Node::identifier("a")]);
        let err = layout_node(&node).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Arity {
                name: "frac".to_string(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_missing_image_is_error() {
        let font = BlockFont::new();
        let config = LayoutConfig {
            integral_image: "missing.png".into(),
            ..LayoutConfig::default()
        };
        let engine = LayoutEngine::with_config(&font, config);
        let err = engine.layout(&parse("\\int").unwrap()).unwrap_err();
        assert!(matches!(err, LayoutError::Measure(_)));
    }

    #[test]
    fn test_dimensions_only_has_no_visual() {
        let font = BlockFont::new();
        let engine = LayoutEngine::with_config(&font, LayoutConfig::default().dimensions_only());
        let b = engine.layout(&parse("\\frac{a}{\\sqrt{b}}").unwrap()).unwrap();
        assert!(b.visual.is_none());
        assert_eq!(b.size(), layout("\\frac{a}{\\sqrt{b}}").size());
    }

    #[test]
    fn test_scaled_truncates() {
        let b = LayoutBox {
            width: 21,
            height: 33,
            visual: None,
        };
        assert_eq!(b.scaled(0.5).unwrap().size(), (10, 16));
    }

    #[test]
    fn test_oversized_config_is_error() {
        let font = BlockFont::new();
        for (source, config) in [
            (
                "a b",
                LayoutConfig {
                    compound_gap: u32::MAX,
                    ..LayoutConfig::default()
                },
            ),
            (
                "\\sqrt{a}",
                LayoutConfig {
                    radical_offset: u32::MAX,
                    ..LayoutConfig::default()
                },
            ),
            (
                "\\frac{a}{b}",
                LayoutConfig {
                    fraction_gap: u32::MAX,
                    ..LayoutConfig::default()
                },
            ),
            (
                "\\sum{a}{b}",
                LayoutConfig {
                    sigma_size: u32::MAX,
                    ..LayoutConfig::default()
                },
            ),
            (
                "x^2",
                LayoutConfig {
                    script_scale: 1e12,
                    ..LayoutConfig::default()
                },
            ),
        ] {
            let engine = LayoutEngine::with_config(&font, config);
            let err = engine.layout(&parse(source).unwrap()).unwrap_err();
            assert_eq!(err, LayoutError::TooLarge { limit: MAX_EXTENT }, "{}", source);
        }
    }

    #[test]
    fn test_huge_rule_is_clipped() {
        let font = BlockFont::new();
        let config = LayoutConfig {
            fraction_rule_offset: u32::MAX,
            fraction_rule_thickness: u32::MAX,
            ..LayoutConfig::default()
        };
        let engine = LayoutEngine::with_config(&font, config);
        let b = engine.layout(&parse("\\frac{a}{b}").unwrap()).unwrap();
        assert_eq!(b.size(), (10, 37));
    }

    #[test]
    fn test_nesting_limit_chain_lays_out() {
        let chain = "a^".repeat(MAX_NESTING - 1) + "a";
        let b = layout_node(&parse(&chain).unwrap()).unwrap();
        // widths settle where w = 20 + w / 2
        assert_eq!(b.size(), (39, 32));
    }

    #[test]
    fn test_hand_built_tree_too_deep() {
        let mut node = Node::identifier("x");
        for _ in 0..MAX_TREE_DEPTH {
            node = Node::function("sqrt", vec![node]);
        }
        let err = layout_node(&node).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TooDeep {
                limit: MAX_TREE_DEPTH
            }
        );
    }

    #[test]
    fn test_custom_gap() {
        let font = BlockFont::new();
        let config = LayoutConfig {
            compound_gap: 0,
            ..LayoutConfig::default()
        };
        let engine = LayoutEngine::with_config(&font, config);
        let b = engine.layout(&parse("a b c").unwrap()).unwrap();
        assert_eq!(b.size(), (60, 32));
    }
}
