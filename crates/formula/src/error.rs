//! Error types for the formula crate

use std::path::PathBuf;
use thiserror::Error;

/// A rejected source program
///
/// Parsing aborts on the first mismatch, so there is never a partial tree to
/// go along with this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} on line {line}")]
pub struct ParseError {
    /// What went wrong, including the offending lexeme
    pub message: String,
    /// 1-based source line at the point of failure
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }

    /// Mismatch on a token; end of input shows up as an empty lexeme
    pub fn unexpected(text: &str, line: usize) -> Self {
        if text.is_empty() {
            Self::new("unexpected end of input", line)
        } else {
            Self::new(format!("unexpected token '{}'", text.escape_debug()), line)
        }
    }
}

/// Errors raised by a measurement backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeasureError {
    /// No image was registered under this path
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The requested visual would exceed the bitmap size limit
    #[error("visual larger than {limit}px on a side")]
    TooLarge { limit: u32 },
}

/// Errors that abort the layout of one formula
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Function name with neither a construct rule nor a glyph entry
    #[error("unknown function '\\{0}'")]
    UnknownFunction(String),

    /// A function node built with the wrong number of arguments
    #[error("'\\{name}' takes {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A box side overflowed or grew past the size limit
    #[error("formula is larger than {limit}px on a side")]
    TooLarge { limit: u32 },

    /// A hand-built tree nested past what the engine will recurse into
    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// The measurement backend could not produce a visual
    #[error("measurement failed: {0}")]
    Measure(#[from] MeasureError),
}

/// Errors loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON or unknown keys
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A field outside its accepted range
    #[error("invalid value for '{field}': {reason}")]
    OutOfRange { field: &'static str, reason: String },

    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any failure of the compile pipeline
#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for pipeline operations
pub type FormulaResult<T> = Result<T, FormulaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::unexpected("}", 3);
        assert_eq!(err.to_string(), "unexpected token '}' on line 3");
    }

    #[test]
    fn test_parse_error_end_of_input() {
        let err = ParseError::unexpected("", 1);
        assert_eq!(err.to_string(), "unexpected end of input on line 1");
    }

    #[test]
    fn test_layout_error_names_function() {
        let err = LayoutError::UnknownFunction("zzz".to_string());
        assert_eq!(err.to_string(), "unknown function '\\zzz'");
    }

    #[test]
    fn test_error_from_parse() {
        let err: FormulaError = ParseError::new("boom", 2).into();
        assert!(matches!(err, FormulaError::Parse(ParseError { line: 2, .. })));
    }

    #[test]
    fn test_size_limit_display() {
        let err = LayoutError::TooLarge { limit: 64 };
        assert_eq!(err.to_string(), "formula is larger than 64px on a side");
    }

    #[test]
    fn test_error_from_measure() {
        let err: LayoutError = MeasureError::ImageNotFound(PathBuf::from("x.png")).into();
        assert_eq!(err.to_string(), "measurement failed: image not found: x.png");
    }
}
