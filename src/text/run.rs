use std::{fmt, ops::Range, sync::Arc};

use crate::font::Glyph;

use super::Style;

/// Glyphs rendered under a single [`Style`].
///
/// A run never changes after construction. Line breaking splits a run by
/// creating new fragments that share the same style.
#[derive(Clone)]
pub struct GlyphRun {
    style: Style,
    glyphs: Vec<Arc<Glyph>>,
    advance: f32,
}

impl GlyphRun {
    /// Shapes `text` with the style's font.
    pub fn new(style: Style, text: &str) -> Self {
        let glyphs = style.font.glyphs(text);
        Self::from_glyphs(style, glyphs)
    }

    /// Builds a run from glyphs that were already resolved.
    pub fn from_glyphs(style: Style, glyphs: Vec<Arc<Glyph>>) -> Self {
        let advance = glyphs.iter().map(|glyph| glyph.advance()).sum();
        Self {
            style,
            glyphs,
            advance,
        }
    }

    /// A new run holding `range` of this run's glyphs.
    pub fn fragment(&self, range: Range<usize>) -> Self {
        Self::from_glyphs(self.style.clone(), self.glyphs[range].to_vec())
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn glyphs(&self) -> &[Arc<Glyph>] {
        &self.glyphs
    }

    /// Sum of the glyph advances.
    pub fn advance(&self) -> f32 {
        self.advance
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The characters of the run.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|glyph| glyph.char()).collect()
    }
}

impl fmt::Debug for GlyphRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlyphRun({:?})", self.text())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_font::FixedFont;

    #[test]
    fn test_advance_is_sum_of_glyph_advances() {
        let font = FixedFont::new(10.0)
            .with_advance(' ', 4.0)
            .with_advance('i', 3.5)
            .shared();
        let run = GlyphRun::new(Style::new(font), "hi there");

        let expected: f32 = run.glyphs().iter().map(|g| g.advance()).sum();
        assert_eq!(run.advance(), expected);
        assert_eq!(run.advance(), 6.0 * 10.0 + 4.0 + 3.5);
        assert_eq!(run.len(), 8);
    }

    #[test]
    fn test_empty_run() {
        let run = GlyphRun::new(Style::new(FixedFont::new(10.0).shared()), "");
        assert!(run.is_empty());
        assert_eq!(run.advance(), 0.0);
    }

    #[test]
    fn test_fragment_keeps_style_and_recomputes_advance() {
        let style = Style::new(FixedFont::new(10.0).with_advance(' ', 5.0).shared())
            .with_color([1.0, 0.0, 0.0, 1.0]);
        let run = GlyphRun::new(style, "ab cd");

        let left = run.fragment(0..3);
        let right = run.fragment(3..5);
        assert_eq!(left.text(), "ab ");
        assert_eq!(right.text(), "cd");
        assert_eq!(left.advance(), 25.0);
        assert_eq!(right.advance(), 20.0);
        assert_eq!(left.style().color, run.style().color);
        // the source run is untouched
        assert_eq!(run.text(), "ab cd");
        assert_eq!(format!("{run:?}"), "GlyphRun(\"ab cd\")");
    }
}
