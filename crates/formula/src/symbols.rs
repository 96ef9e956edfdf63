//! Compile-time name tables
//!
//! The parser needs the arity of every function name, and the layout engine
//! needs the glyph behind every zero-argument name. Both tables are fixed.

use serde::{Deserialize, Serialize};

// =============================================================================
// Glyph code points
// =============================================================================

pub const PI: char = '\u{03C0}';
pub const THETA: char = '\u{03B8}';
pub const PHI: char = '\u{03C6}';
pub const DELTA: char = '\u{03B4}';
pub const INFINITY: char = '\u{221E}';
pub const RIGHT_ARROW: char = '\u{2192}';
pub const LAMBDA: char = '\u{03BB}';
pub const MU: char = '\u{03BC}';
pub const OMEGA: char = '\u{03C9}';
pub const EPSILON: char = '\u{03B5}';
pub const PLUS_MINUS: char = '\u{00B1}';
pub const TIMES: char = '\u{00D7}';
pub const DOT: char = '\u{22C5}';
pub const LESS_EQUAL: char = '\u{2264}';
pub const GREATER_EQUAL: char = '\u{2265}';

// =============================================================================
// Special Glyphs
// =============================================================================

/// A zero-argument function that renders as a single glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialGlyph {
    Pi,
    Theta,
    Phi,
    Delta,
    Inf,
    To,
    Lambda,
    Mu,
    Omega,
    Epsilon,
    PlusMinus,
    Cross,
    Dot,
    Le,
    Ge,
}

impl SpecialGlyph {
    /// Every glyph, in table order
    pub const ALL: [SpecialGlyph; 15] = [
        SpecialGlyph::Pi,
        SpecialGlyph::Theta,
        SpecialGlyph::Phi,
        SpecialGlyph::Delta,
        SpecialGlyph::Inf,
        SpecialGlyph::To,
        SpecialGlyph::Lambda,
        SpecialGlyph::Mu,
        SpecialGlyph::Omega,
        SpecialGlyph::Epsilon,
        SpecialGlyph::PlusMinus,
        SpecialGlyph::Cross,
        SpecialGlyph::Dot,
        SpecialGlyph::Le,
        SpecialGlyph::Ge,
    ];

    /// Look up a glyph by its markup name (without the backslash)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|glyph| glyph.name() == name)
    }

    /// The markup name, as written after `\`
    pub fn name(self) -> &'static str {
        match self {
            SpecialGlyph::Pi => "pi",
            SpecialGlyph::Theta => "theta",
            SpecialGlyph::Phi => "phi",
            SpecialGlyph::Delta => "delta",
            SpecialGlyph::Inf => "inf",
            SpecialGlyph::To => "to",
            SpecialGlyph::Lambda => "lambda",
            SpecialGlyph::Mu => "mu",
            SpecialGlyph::Omega => "omega",
            SpecialGlyph::Epsilon => "epsilon",
            SpecialGlyph::PlusMinus => "plusminus",
            SpecialGlyph::Cross => "cross",
            SpecialGlyph::Dot => "dot",
            SpecialGlyph::Le => "le",
            SpecialGlyph::Ge => "ge",
        }
    }

    /// The rendered character
    pub fn as_char(self) -> char {
        match self {
            SpecialGlyph::Pi => PI,
            SpecialGlyph::Theta => THETA,
            SpecialGlyph::Phi => PHI,
            SpecialGlyph::Delta => DELTA,
            SpecialGlyph::Inf => INFINITY,
            SpecialGlyph::To => RIGHT_ARROW,
            SpecialGlyph::Lambda => LAMBDA,
            SpecialGlyph::Mu => MU,
            SpecialGlyph::Omega => OMEGA,
            SpecialGlyph::Epsilon => EPSILON,
            SpecialGlyph::PlusMinus => PLUS_MINUS,
            SpecialGlyph::Cross => TIMES,
            SpecialGlyph::Dot => DOT,
            SpecialGlyph::Le => LESS_EQUAL,
            SpecialGlyph::Ge => GREATER_EQUAL,
        }
    }
}

// =============================================================================
// Function Names
// =============================================================================

pub const FRAC: &str = "frac";
pub const SUPERSCRIPT: &str = "^";
pub const SUBSCRIPT: &str = "_";
pub const SUM: &str = "sum";
pub const LIM: &str = "lim";
pub const SQRT: &str = "sqrt";
pub const VEC: &str = "vec";
pub const INT: &str = "int";
pub const OINT: &str = "oint";

/// Number of arguments the parser consumes after a function name.
///
/// Names missing from the table report 0 so that a misspelled function
/// still parses; the layout engine rejects it later.
pub fn arity(name: &str) -> usize {
    match name {
        FRAC | SUPERSCRIPT | SUBSCRIPT | SUM => 2,
        LIM | SQRT | VEC => 1,
        _ => 0,
    }
}
