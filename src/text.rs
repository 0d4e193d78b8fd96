/// Drawing of laid-out text into a command buffer.
pub mod draw;
/// The line-breaking and positioning engine.
pub mod layout;
/// A row of runs produced by layout.
pub mod line;
/// Glyph sequences sharing one style.
pub mod run;
/// Font and color choices applied to runs.
pub mod style;

pub use draw::{draw_glyph_layout, draw_string};
pub use layout::{Alignment, GlyphLayout, LayoutParams, Overflow, VerticalAlignment};
pub use line::GlyphLine;
pub use run::GlyphRun;
pub use style::Style;
