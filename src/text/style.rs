use std::{fmt, sync::Arc};

use crate::commands::Color;
use crate::font::GlyphSource;

/// Font and colors shared by one or more [`super::GlyphRun`]s.
///
/// Cloning is cheap; the font is reference counted.
#[derive(Clone)]
pub struct Style {
    pub font: Arc<dyn GlyphSource>,
    /// Foreground color. `None` keeps the color already in effect.
    pub color: Option<Color>,
    /// Fill behind the run. `None` draws no background.
    pub background_color: Option<Color>,
}

impl Style {
    pub fn new(font: Arc<dyn GlyphSource>) -> Self {
        Self {
            font,
            color: None,
            background_color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<Color>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Style")
            .field("metrics", &self.font.metrics())
            .field("color", &self.color)
            .field("background_color", &self.background_color)
            .finish()
    }
}
