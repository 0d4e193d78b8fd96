use std::{cell::OnceCell, collections::VecDeque, sync::Arc};

use crate::native::native_enum;

use super::{GlyphLine, GlyphRun};

native_enum! {
    /// Horizontal alignment, applied to every line individually.
    pub enum Alignment {
        Left = 0 => "left",
        Center = 1 => "center",
        Right = 2 => "right",
    }
}

native_enum! {
    /// Vertical alignment of the block of lines against the pivot or box.
    pub enum VerticalAlignment {
        /// The first line's baseline sits on the pivot. Only meaningful
        /// without a height; with one it behaves like `Top`.
        Baseline = 0 => "baseline",
        Top = 1 => "top",
        Center = 2 => "center",
        Bottom = 3 => "bottom",
    }
}

native_enum! {
    /// What to do with text wider than the layout width.
    pub enum Overflow {
        /// Never wrap; text may extend past the box.
        None = 0 => "none",
        /// Break at spaces and zero-width spaces, falling back to characters.
        Wrap = 1 => "wrap",
        /// Break between any two characters.
        WrapCharacters = 2 => "wrap_characters",
    }
}

/// Configuration of a [`GlyphLayout`].
///
/// `x`/`y` is the pivot. When `width`/`height` are set they describe a box
/// whose top-left corner is the pivot, and alignment is relative to the box.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub align: Alignment,
    pub vertical_align: VerticalAlignment,
    pub overflow: Overflow,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            align: Alignment::Left,
            vertical_align: VerticalAlignment::Baseline,
            overflow: Overflow::Wrap,
        }
    }
}

/// Derived output of one layout pass.
#[derive(Clone, Debug, Default)]
struct LayoutOutput {
    lines: Vec<GlyphLine>,
    content_width: f32,
    content_height: f32,
}

/// Styled runs laid out into positioned lines.
///
/// The lines are computed on first access and cached. Every setter that
/// changes a value drops the cache, so a layout can be updated each frame
/// (for example to follow the window size) and only recomputes when
/// something actually changed.
///
/// The input runs are shared and never modified; splitting a run during
/// wrapping creates new fragments.
#[derive(Clone, Debug)]
pub struct GlyphLayout {
    runs: Vec<Arc<GlyphRun>>,
    params: LayoutParams,
    cache: OnceCell<LayoutOutput>,
}

impl GlyphLayout {
    /// Creates a layout pivoted at `(x, y)` with default parameters.
    pub fn new(runs: impl IntoIterator<Item = impl Into<Arc<GlyphRun>>>, x: f32, y: f32) -> Self {
        Self::with_params(
            runs,
            LayoutParams {
                x,
                y,
                ..LayoutParams::default()
            },
        )
    }

    pub fn with_params(
        runs: impl IntoIterator<Item = impl Into<Arc<GlyphRun>>>,
        params: LayoutParams,
    ) -> Self {
        Self {
            runs: runs.into_iter().map(Into::into).collect(),
            params,
            cache: OnceCell::new(),
        }
    }

    /// Positioned lines, recomputed if any parameter changed.
    pub fn lines(&self) -> &[GlyphLine] {
        &self.output().lines
    }

    /// Sum of the lines' content widths.
    pub fn content_width(&self) -> f32 {
        self.output().content_width
    }

    /// Sum of the lines' heights (descent minus ascent).
    pub fn content_height(&self) -> f32 {
        self.output().content_height
    }

    /// Whether the cached lines are up to date.
    pub fn is_valid(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Drops the cached lines.
    pub fn invalidate(&mut self) {
        self.cache.take();
    }

    fn output(&self) -> &LayoutOutput {
        self.cache
            .get_or_init(|| compute_layout(&self.runs, &self.params))
    }
}

/// Parameter access. Setters only invalidate when the value changes.
impl GlyphLayout {
    pub fn runs(&self) -> &[Arc<GlyphRun>] {
        &self.runs
    }

    /// Replaces the input runs. Always invalidates.
    pub fn set_runs(&mut self, runs: impl IntoIterator<Item = impl Into<Arc<GlyphRun>>>) {
        self.runs = runs.into_iter().map(Into::into).collect();
        self.invalidate();
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn set_params(&mut self, params: LayoutParams) {
        if replace(&mut self.params, params) {
            self.invalidate();
        }
    }

    pub fn x(&self) -> f32 {
        self.params.x
    }

    pub fn set_x(&mut self, x: f32) {
        if replace(&mut self.params.x, x) {
            self.invalidate();
        }
    }

    pub fn y(&self) -> f32 {
        self.params.y
    }

    pub fn set_y(&mut self, y: f32) {
        if replace(&mut self.params.y, y) {
            self.invalidate();
        }
    }

    pub fn width(&self) -> Option<f32> {
        self.params.width
    }

    pub fn set_width(&mut self, width: Option<f32>) {
        if replace(&mut self.params.width, width) {
            self.invalidate();
        }
    }

    pub fn height(&self) -> Option<f32> {
        self.params.height
    }

    pub fn set_height(&mut self, height: Option<f32>) {
        if replace(&mut self.params.height, height) {
            self.invalidate();
        }
    }

    pub fn align(&self) -> Alignment {
        self.params.align
    }

    pub fn set_align(&mut self, align: Alignment) {
        if replace(&mut self.params.align, align) {
            self.invalidate();
        }
    }

    pub fn vertical_align(&self) -> VerticalAlignment {
        self.params.vertical_align
    }

    pub fn set_vertical_align(&mut self, vertical_align: VerticalAlignment) {
        if replace(&mut self.params.vertical_align, vertical_align) {
            self.invalidate();
        }
    }

    pub fn overflow(&self) -> Overflow {
        self.params.overflow
    }

    pub fn set_overflow(&mut self, overflow: Overflow) {
        if replace(&mut self.params.overflow, overflow) {
            self.invalidate();
        }
    }
}

/// Stores `value` in `slot`, reporting whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Runs the full layout pipeline.
///
/// Stage 1 distributes the runs over lines, wrapping only when a width is
/// set, overflow is enabled and the text does not fit. Stage 2 sums the line
/// metrics and assigns each line its pen position.
fn compute_layout(runs: &[Arc<GlyphRun>], params: &LayoutParams) -> LayoutOutput {
    if runs.is_empty() {
        return LayoutOutput::default();
    }

    let natural_width: f32 = runs.iter().map(|run| run.advance()).sum();
    let mut lines = match params.width {
        Some(width) if params.overflow != Overflow::None && natural_width > width => {
            break_lines(runs, width, params.overflow)
        }
        _ => vec![GlyphLine::with_content_width(runs.to_vec(), natural_width)],
    };

    let content_width = lines.iter().map(|line| line.content_width).sum();
    let content_height = lines.iter().map(|line| line.descent - line.ascent).sum();
    position_lines(&mut lines, params, content_height);

    LayoutOutput {
        lines,
        content_width,
        content_height,
    }
}

/// Where to split the accumulated runs of a line.
///
/// The line keeps `glyphs[..end]` of run `run`; `glyphs[start..]` starts the
/// next line. Runs after `run` move to the next line whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BreakPoint {
    run: usize,
    end: usize,
    start: usize,
}

/// Fills lines greedily, breaking as soon as the pen passes `width`.
fn break_lines(runs: &[Arc<GlyphRun>], width: f32, overflow: Overflow) -> Vec<GlyphLine> {
    let mut remaining: VecDeque<Arc<GlyphRun>> = runs.iter().cloned().collect();
    let mut line_runs: Vec<Arc<GlyphRun>> = Vec::new();
    let mut lines = Vec::new();
    let mut x = 0.0;

    while let Some(run) = remaining.pop_front() {
        x += run.advance();
        line_runs.push(run);
        if x <= width {
            continue;
        }

        let found = match overflow {
            Overflow::None => None,
            Overflow::Wrap => find_word_break(x, width, &line_runs)
                .or_else(|| find_character_break(x, width, &line_runs)),
            Overflow::WrapCharacters => find_character_break(x, width, &line_runs),
        };
        if let Some(point) = found {
            split_runs(&mut line_runs, &mut remaining, point);
        }

        if !line_runs.is_empty() {
            lines.push(GlyphLine::new(std::mem::take(&mut line_runs)));
            x = 0.0;
        }
    }

    if !line_runs.is_empty() {
        lines.push(GlyphLine::new(line_runs));
    }
    lines
}

fn is_word_break(ch: char) -> bool {
    ch == ' ' || ch == '\u{200B}'
}

/// Scans backwards from the overflow point for a space or zero-width space
/// that starts inside the width. The very first glyph of the line never
/// qualifies. The break glyph stays on the current line.
fn find_word_break(mut x: f32, width: f32, line_runs: &[Arc<GlyphRun>]) -> Option<BreakPoint> {
    for (run_index, run) in line_runs.iter().enumerate().rev() {
        for (index, glyph) in run.glyphs().iter().enumerate().rev() {
            x -= glyph.advance();
            if x >= width {
                continue;
            }

            if is_word_break(glyph.char()) && (run_index != 0 || index != 0) {
                return Some(BreakPoint {
                    run: run_index,
                    end: index + 1,
                    start: index + 1,
                });
            }
        }
    }
    None
}

/// Scans backwards for the last glyph that starts inside the width and
/// moves it, and everything after it, to the next line.
fn find_character_break(
    mut x: f32,
    width: f32,
    line_runs: &[Arc<GlyphRun>],
) -> Option<BreakPoint> {
    for (run_index, run) in line_runs.iter().enumerate().rev() {
        for (index, glyph) in run.glyphs().iter().enumerate().rev() {
            x -= glyph.advance();
            if x >= width {
                continue;
            }

            return Some(BreakPoint {
                run: run_index,
                end: index,
                start: index,
            });
        }
    }
    None
}

/// Applies `point`: everything right of it goes back to the front of
/// `remaining`, in order.
fn split_runs(
    line_runs: &mut Vec<Arc<GlyphRun>>,
    remaining: &mut VecDeque<Arc<GlyphRun>>,
    point: BreakPoint,
) {
    let nothing_before = line_runs[..point.run.min(line_runs.len())]
        .iter()
        .all(|run| run.is_empty());
    let mut tail = line_runs.split_off(point.run);
    if tail.is_empty() {
        return;
    }
    let split_run = tail.remove(0);
    for run in tail.into_iter().rev() {
        remaining.push_front(run);
    }

    let len = split_run.len();
    let (mut end, mut start) = (point.end.min(len), point.start.min(len));
    if nothing_before && end == 0 {
        // Nothing visible would stay on this line; keep one glyph so the queue shrinks.
        end = len.min(1);
        start = start.max(end);
    }

    if start == 0 {
        remaining.push_front(Arc::clone(&split_run));
    } else if start < len {
        remaining.push_front(Arc::new(split_run.fragment(start..len)));
    }
    if end == len {
        line_runs.push(split_run);
    } else if end > 0 {
        line_runs.push(Arc::new(split_run.fragment(0..end)));
    }
}

/// Assigns each line its baseline origin.
///
/// Lines are stepped using the first line's ascent and descent.
fn position_lines(lines: &mut [GlyphLine], params: &LayoutParams, content_height: f32) {
    let Some(first) = lines.first() else {
        return;
    };
    let (first_ascent, first_descent) = (first.ascent, first.descent);

    let mut x = params.x;
    let mut y = params.y;
    let mut vertical_align = params.vertical_align;

    // Align relative to the box rather than the pivot.
    if let Some(width) = params.width {
        match params.align {
            Alignment::Left => {}
            Alignment::Center => x += width / 2.0,
            Alignment::Right => x += width,
        }
    }
    if let Some(height) = params.height {
        match vertical_align {
            VerticalAlignment::Top => {}
            VerticalAlignment::Center => y += height / 2.0,
            VerticalAlignment::Bottom => y += height,
            VerticalAlignment::Baseline => vertical_align = VerticalAlignment::Top,
        }
    }

    match vertical_align {
        VerticalAlignment::Top => {}
        VerticalAlignment::Center => y -= content_height / 2.0,
        VerticalAlignment::Bottom => y -= content_height + first_descent,
        VerticalAlignment::Baseline => y += first_ascent,
    }

    for line in lines.iter_mut() {
        line.x = match params.align {
            Alignment::Left => x,
            Alignment::Center => x - line.content_width / 2.0,
            Alignment::Right => x - line.content_width,
        };

        y -= first_ascent;
        line.y = y;
        y += first_descent;
    }
}
