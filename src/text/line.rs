use std::sync::Arc;

use euclid::default::Point2D;

use super::GlyphRun;

/// Runs that share one visual line.
///
/// `ascent` is the smallest (tallest, since it is negative) ascent of the
/// runs' fonts and `descent` the largest descent. `x`/`y` is the pen position
/// of the line's baseline origin, assigned by [`super::GlyphLayout`].
#[derive(Clone, Debug)]
pub struct GlyphLine {
    pub runs: Vec<Arc<GlyphRun>>,
    pub content_width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub x: f32,
    pub y: f32,
}

impl GlyphLine {
    pub fn new(runs: Vec<Arc<GlyphRun>>) -> Self {
        let content_width = runs.iter().map(|run| run.advance()).sum();
        Self::with_content_width(runs, content_width)
    }

    /// Builds a line whose width has already been summed by the caller.
    pub fn with_content_width(runs: Vec<Arc<GlyphRun>>, content_width: f32) -> Self {
        let ascent = runs
            .iter()
            .map(|run| run.style().font.ascent())
            .reduce(f32::min)
            .unwrap_or(0.0);
        let descent = runs
            .iter()
            .map(|run| run.style().font.descent())
            .reduce(f32::max)
            .unwrap_or(0.0);

        Self {
            runs,
            content_width,
            ascent,
            descent,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Baseline origin of the line.
    pub fn origin(&self) -> Point2D<f32> {
        Point2D::new(self.x, self.y)
    }

    /// Distance from the top of the line to its bottom.
    pub fn height(&self) -> f32 {
        self.descent - self.ascent
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_font::FixedFont;
    use crate::text::Style;

    #[test]
    fn test_metrics_take_extremes_across_runs() {
        let small = Style::new(FixedFont::new(5.0).with_metrics(-8.0, 2.0).shared());
        let large = Style::new(FixedFont::new(9.0).with_metrics(-20.0, 1.0).shared());

        let line = GlyphLine::new(vec![
            Arc::new(GlyphRun::new(small, "ab")),
            Arc::new(GlyphRun::new(large, "c")),
        ]);

        assert_eq!(line.content_width, 19.0);
        assert_eq!(line.ascent, -20.0);
        assert_eq!(line.descent, 2.0);
        assert_eq!(line.height(), 22.0);
        assert_eq!(line.origin(), Point2D::new(0.0, 0.0));
    }
}
