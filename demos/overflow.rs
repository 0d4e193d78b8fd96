use std::sync::{
    Arc,
    atomic::{AtomicI32, Ordering},
};

use bacon::{
    Context, Font, FontStorage, FrameDriver, Game, GlyphSource, Image, ImageFactory, Result,
    commands::RecordingExecutor,
    fontdb::{Family, Query},
    native::ImageHandle,
    text::{self, Alignment, GlyphLayout, GlyphRun, LayoutParams, Overflow, Style},
};

const TEXT: &str = "The quick brown fox jumps over the lazy dog. \
                    Pneumonoultramicroscopicsilicovolcanoconiosis is rather long.";

/// Hands out increasing handles instead of uploading to a GPU.
#[derive(Default)]
struct CountingImages {
    next: AtomicI32,
}

impl ImageFactory for CountingImages {
    fn create_alpha_image(&self, width: u32, height: u32, _coverage: &[u8]) -> Result<Image> {
        let handle = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Image::from_handle(ImageHandle(handle), width, height))
    }
}

/// Re-wraps the same text each frame into a narrower box.
struct OverflowDemo {
    layouts: Vec<GlyphLayout>,
    width: f32,
}

impl OverflowDemo {
    fn new(font: Arc<dyn GlyphSource>) -> Self {
        let layouts = [Overflow::None, Overflow::Wrap, Overflow::WrapCharacters]
            .into_iter()
            .enumerate()
            .map(|(i, overflow)| {
                let run = GlyphRun::new(Style::new(font.clone()), TEXT);
                GlyphLayout::with_params(
                    [run],
                    LayoutParams {
                        x: 10.0 + 400.0 * i as f32,
                        y: 10.0,
                        width: Some(380.0),
                        align: Alignment::Center,
                        overflow,
                        ..LayoutParams::default()
                    },
                )
            })
            .collect();

        Self {
            layouts,
            width: 380.0,
        }
    }
}

impl Game for OverflowDemo {
    fn on_tick(&mut self, ctx: &mut Context) -> Result<()> {
        for layout in &mut self.layouts {
            layout.set_width(Some(self.width));
            println!(
                "{:>15} width={:>5.1} lines={} content={:.1}x{:.1}",
                layout.overflow().name(),
                self.width,
                layout.lines().len(),
                layout.content_width(),
                layout.content_height(),
            );
            text::draw_glyph_layout(ctx.commands(), layout);
        }

        self.width -= 90.0;
        if self.width < 0.0 {
            ctx.quit();
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
fn main() {
    env_logger::init();

    // 1. Find a font
    let mut storage = FontStorage::new();
    storage.load_system_fonts();
    let query = Query {
        families: &[Family::SansSerif, Family::Serif],
        ..Query::default()
    };
    let Some(face_id) = storage
        .query(&query)
        .map(|(id, _)| id)
        .or_else(|| storage.faces().next().map(|face| face.id))
    else {
        eprintln!("no fonts installed");
        return;
    };
    let images = Arc::new(CountingImages::default());
    let font: Arc<dyn GlyphSource> =
        Arc::new(Font::new(&mut storage, face_id, 18.0, images).unwrap());

    // 2. Drive a few frames against an executor that only records
    let mut driver = FrameDriver::new(RecordingExecutor::new());
    let mut game = OverflowDemo::new(font);
    driver.run(&mut game).unwrap();

    for (frame, batch) in driver.executor().batches().iter().enumerate() {
        println!(
            "frame {frame}: {} command words, {} operands",
            batch.commands.len(),
            batch.data.len()
        );
    }
}
