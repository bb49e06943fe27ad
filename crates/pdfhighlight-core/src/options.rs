//! Tunable parameters for keyword matching.

use crate::geometry::Margins;

/// Options controlling how keyword occurrences are located and confirmed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighlightOptions {
    /// Growth applied to an exact-mode occurrence before collecting the
    /// words around it. The right edge is wider so a punctuation glyph sitting
    /// just past the literal match is still picked up.
    pub boundary_margins: Margins,
    /// Whether the rendered-text rectangle search distinguishes letter case
    /// (default: `false`). The text-level presence check is always
    /// case-insensitive.
    pub case_sensitive_search: bool,
    /// Maximum horizontal gap between glyphs of the same word. Spacing made
    /// with TJ adjustments of exactly this size does not separate words.
    pub x_tolerance: f64,
    /// Maximum vertical offset between glyphs of the same line.
    pub y_tolerance: f64,
    /// Upper bound, in bytes, on the compiled size of a presence pattern.
    pub pattern_size_limit: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            boundary_margins: Margins::new(2.0, 2.0, 5.0, 2.0),
            case_sensitive_search: false,
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            pattern_size_limit: 1 << 20,
        }
    }
}
