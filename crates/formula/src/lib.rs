//! Formula Crate - Compile backslash math markup into composited boxes
//!
//! This crate provides the whole formula pipeline:
//! - A lexer turning source text into tokens
//! - A recursive-descent parser building a formula tree
//! - A layout engine compositing the tree into one sized bitmap
//! - A `Measure` seam for text and image rasterization, with a fixed-cell
//!   `BlockFont` backend
//!
//! ```
//! use formula::{compile, BlockFont, LayoutConfig};
//!
//! let font = BlockFont::new();
//! let root = compile("\\frac{a}{b}", &font, &LayoutConfig::default()).unwrap();
//! assert_eq!((root.width, root.height), (10, 37));
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod model;
pub mod parser;
pub mod raster;
pub mod symbols;

pub use config::{BlockFontConfig, LayoutConfig};
pub use error::*;
pub use layout::{LayoutBox, LayoutEngine};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use measure::{BlockFont, Measure, Measured};
pub use model::Node;
pub use parser::{parse, Parser};
pub use raster::{Bitmap, Point, Rect};
pub use symbols::SpecialGlyph;

/// Parse and lay out one formula.
///
/// A rejected formula yields no partial output; the error names the offending
/// lexeme or function.
pub fn compile(
    source: &str,
    measure: &dyn Measure,
    config: &LayoutConfig,
) -> FormulaResult<LayoutBox> {
    let span = tracing::debug_span!("compile", bytes = source.len());
    let _guard = span.enter();

    let tree = parse(source)?;
    tracing::debug!(nodes = tree.node_count(), depth = tree.depth(), "parsed formula");

    let engine = LayoutEngine::with_config(measure, config.clone());
    Ok(engine.layout(&tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================================
    // Integration Tests
    // =============================================================================

    #[test]
    fn test_compile_pipeline() {
        let font = BlockFont::new();
        let root = compile("x^2 + \\sqrt{y}", &font, &LayoutConfig::default()).unwrap();
        // x^2: 30, "+": 20, sqrt{y}: 30, two gaps
        assert_eq!(root.size(), (30 + 10 + 20 + 10 + 30, 32));
        assert!(root.visual.unwrap().ink_count() > 0);
    }

    #[test]
    fn test_compile_parse_error() {
        let font = BlockFont::new();
        let err = compile("{a", &font, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, FormulaError::Parse(_)));
    }

    #[test]
    fn test_compile_unknown_function() {
        let font = BlockFont::new();
        let err = compile("\\unknown{a}", &font, &LayoutConfig::default()).unwrap_err();
        match err {
            FormulaError::Layout(LayoutError::UnknownFunction(name)) => assert_eq!(name, "unknown"),
            other => panic!("Expected unknown function, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_does_not_affect_other_formulas() {
        let font = BlockFont::new();
        let config = LayoutConfig::default();
        assert!(compile("\\zzz{}", &font, &config).is_err());
        assert_eq!(compile("a", &font, &config).unwrap().size(), (20, 32));
    }

    #[test]
    fn test_compile_runaway_nesting() {
        let font = BlockFont::new();
        let source = "a^".repeat(20_000) + "a";
        let err = compile(&source, &font, &LayoutConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "parse error: nesting too deep on line 1");
    }

    #[test]
    fn test_compile_oversized_gap() {
        let font = BlockFont::new();
        let config = LayoutConfig {
            compound_gap: u32::MAX,
            ..LayoutConfig::default()
        };
        let err = compile("a b", &font, &config).unwrap_err();
        assert!(matches!(err, FormulaError::Layout(LayoutError::TooLarge { .. })));
    }

    #[test]
    fn test_compile_multiline_document() {
        let font = BlockFont::new();
        let root = compile("\\lim{x \\to 0}\n\\frac{\\delta}{x}\n", &font, &LayoutConfig::default())
            .unwrap();
        assert!(root.width > 0);
    }
}
