use std::sync::Arc;

use euclid::default::Box2D;
use euclid::point2;

use crate::commands::CommandBuffer;
use crate::font::GlyphSource;

use super::{GlyphLayout, GlyphLine, GlyphRun, LayoutParams, Style};

/// Records the draw commands for every glyph of `layout`.
///
/// Runs with a color change the current color inside a single pushed color
/// state, which is popped again as soon as a run without a color follows and
/// at the end. Glyphs without an image only advance the pen.
pub fn draw_glyph_layout(commands: &mut CommandBuffer, layout: &GlyphLayout) {
    let mut pushed_color = false;

    for line in layout.lines() {
        let mut x = line.x;
        let y = line.y;

        for run in &line.runs {
            let style = run.style();
            match style.color {
                Some(color) => {
                    if !pushed_color {
                        commands.push_color();
                        pushed_color = true;
                    }
                    commands.set_color(color);
                }
                None if pushed_color => {
                    commands.pop_color();
                    pushed_color = false;
                }
                None => {}
            }

            draw_background(commands, line, run, x);

            for glyph in run.glyphs() {
                if let Some(image) = glyph.image() {
                    commands.draw_image_at(image, x + glyph.offset_x(), y - glyph.offset_y());
                }
                x += glyph.advance();
            }
        }
    }

    if pushed_color {
        commands.pop_color();
    }
}

fn draw_background(commands: &mut CommandBuffer, line: &GlyphLine, run: &GlyphRun, x: f32) {
    let Some(background) = run.style().background_color else {
        return;
    };

    commands.push_color();
    commands.set_color(background);
    commands.fill_rect(Box2D::new(
        point2(x, line.y + line.ascent),
        point2(x + run.advance(), line.y + line.descent),
    ));
    commands.pop_color();
}

/// Lays out `text` as a single run in `font` and draws it.
///
/// The string is drawn in the current color.
pub fn draw_string(
    commands: &mut CommandBuffer,
    font: Arc<dyn GlyphSource>,
    text: &str,
    params: LayoutParams,
) {
    let run = GlyphRun::new(Style::new(font), text);
    let layout = GlyphLayout::with_params([run], params);
    draw_glyph_layout(commands, &layout);
}
