//! Glyphs and the fonts that produce them.
//!
//! The layout engine only needs per-character glyph metrics and the font's
//! vertical metrics; both are exposed through the [`GlyphSource`] trait.
//! [`Font`] is the stock implementation, rasterizing with `fontdue` and
//! uploading glyph bitmaps through an [`ImageFactory`].

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::error::{BaconError, Result};
use crate::font_storage::FontStorage;
use crate::image::{Image, ImageFactory};

/// Image and metrics for rendering one character in a particular font.
///
/// Offsets and advance are in pixels. The image is drawn with its top-left
/// corner at `(pen_x + offset_x, baseline_y - offset_y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    ch: char,
    image: Option<Image>,
    offset_x: f32,
    offset_y: f32,
    advance: f32,
}

impl Glyph {
    pub fn new(ch: char, image: Option<Image>, offset_x: f32, offset_y: f32, advance: f32) -> Self {
        Self {
            ch,
            image,
            offset_x,
            offset_y,
            advance,
        }
    }

    /// The character this glyph renders.
    pub fn char(&self) -> char {
        self.ch
    }

    /// `None` for characters with nothing to draw, such as spaces.
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Horizontal advance, in pixels.
    pub fn advance(&self) -> f32 {
        self.advance
    }
}

/// Vertical design metrics of a font at one size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Extent above the baseline; typically negative (y points down).
    pub ascent: f32,
    /// Extent below the baseline; typically positive.
    pub descent: f32,
}

/// Resolves characters to glyphs for one font at one size.
pub trait GlyphSource: Send + Sync {
    fn metrics(&self) -> FontMetrics;

    fn glyph(&self, ch: char) -> Arc<Glyph>;

    fn glyphs(&self, text: &str) -> Vec<Arc<Glyph>> {
        text.chars().map(|ch| self.glyph(ch)).collect()
    }

    fn ascent(&self) -> f32 {
        self.metrics().ascent
    }

    fn descent(&self) -> f32 {
        self.metrics().descent
    }
}

/// A font face loaded at a particular pixel size.
///
/// Glyphs are rasterized the first time a character is requested and kept
/// for the lifetime of the font.
pub struct Font {
    face_id: fontdb::ID,
    size: f32,
    face: Arc<fontdue::Font>,
    metrics: FontMetrics,
    images: Arc<dyn ImageFactory>,
    glyphs: Mutex<HashMap<char, Arc<Glyph>, fxhash::FxBuildHasher>>,
}

impl Font {
    /// Creates a font from a face registered in `storage`.
    pub fn new(
        storage: &mut FontStorage,
        face_id: fontdb::ID,
        size: f32,
        images: Arc<dyn ImageFactory>,
    ) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(BaconError::InvalidFontSize);
        }

        let face = storage
            .font(face_id)
            .ok_or_else(|| BaconError::FontLoad(format!("face {face_id:?} could not be parsed")))?;

        let metrics = match face.horizontal_line_metrics(size) {
            Some(line) => FontMetrics {
                ascent: -line.ascent.round(),
                descent: -line.descent.round(),
            },
            None => {
                log::warn!("face {face_id:?} has no horizontal metrics; using the font size");
                FontMetrics {
                    ascent: -size.round(),
                    descent: 0.0,
                }
            }
        };

        Ok(Self {
            face_id,
            size,
            face,
            metrics,
            images,
            glyphs: Mutex::new(HashMap::with_hasher(fxhash::FxBuildHasher::default())),
        })
    }

    /// Creates a font from the face that best matches `query`.
    pub fn from_query(
        storage: &mut FontStorage,
        query: &fontdb::Query,
        size: f32,
        images: Arc<dyn ImageFactory>,
    ) -> Result<Self> {
        let (face_id, _) = storage
            .query(query)
            .ok_or_else(|| BaconError::FontLoad("no face matches the query".to_string()))?;
        Self::new(storage, face_id, size, images)
    }

    pub fn face_id(&self) -> fontdb::ID {
        self.face_id
    }

    /// Pixel size the font was loaded at.
    pub fn size(&self) -> f32 {
        self.size
    }

    fn rasterize(&self, ch: char) -> Glyph {
        let (metrics, coverage) = self.face.rasterize(ch, self.size);

        let image = if metrics.width == 0 || metrics.height == 0 {
            None
        } else {
            match self
                .images
                .create_alpha_image(metrics.width as u32, metrics.height as u32, &coverage)
            {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("glyph {ch:?} could not be uploaded: {e}");
                    None
                }
            }
        };

        Glyph::new(
            ch,
            image,
            metrics.xmin as f32,
            (metrics.ymin + metrics.height as i32) as f32,
            metrics.advance_width.round(),
        )
    }
}

impl GlyphSource for Font {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn glyph(&self, ch: char) -> Arc<Glyph> {
        if let Some(glyph) = self.glyphs.lock().get(&ch) {
            return Arc::clone(glyph);
        }

        // The image factory may call back into this font; upload unlocked.
        let glyph = Arc::new(self.rasterize(ch));
        Arc::clone(self.glyphs.lock().entry(ch).or_insert(glyph))
    }
}

/// Deterministic glyph source for layout tests.
#[cfg(test)]
pub(crate) mod test_font {
    use super::*;
    use crate::native::ImageHandle;

    /// Every character advances by the same amount unless overridden.
    /// Whitespace glyphs carry no image; other glyphs use their code point as
    /// image handle.
    pub struct FixedFont {
        advance: f32,
        metrics: FontMetrics,
        overrides: HashMap<char, f32>,
    }

    impl FixedFont {
        pub fn new(advance: f32) -> Self {
            Self {
                advance,
                metrics: FontMetrics {
                    ascent: -8.0,
                    descent: 2.0,
                },
                overrides: HashMap::new(),
            }
        }

        pub fn with_metrics(mut self, ascent: f32, descent: f32) -> Self {
            self.metrics = FontMetrics { ascent, descent };
            self
        }

        pub fn with_advance(mut self, ch: char, advance: f32) -> Self {
            self.overrides.insert(ch, advance);
            self
        }

        pub fn shared(self) -> Arc<dyn GlyphSource> {
            Arc::new(self)
        }
    }

    impl GlyphSource for FixedFont {
        fn metrics(&self) -> FontMetrics {
            self.metrics
        }

        fn glyph(&self, ch: char) -> Arc<Glyph> {
            let advance = self.overrides.get(&ch).copied().unwrap_or(self.advance);
            let image = (!ch.is_whitespace() && ch != '\u{200B}')
                .then(|| Image::from_handle(ImageHandle(ch as i32), 4, 6));
            Arc::new(Glyph::new(ch, image, 1.0, 6.0, advance))
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::ImageHandle;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[derive(Default)]
    struct CountingImages {
        created: AtomicI32,
    }

    impl ImageFactory for CountingImages {
        fn create_alpha_image(&self, width: u32, height: u32, coverage: &[u8]) -> Result<Image> {
            assert_eq!(coverage.len(), (width * height) as usize);
            let handle = self.created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Image::from_handle(ImageHandle(handle), width, height))
        }
    }

    /// Picks an installed face, preferring the generic families.
    fn system_face(storage: &mut FontStorage) -> fontdb::ID {
        storage.load_system_fonts();
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif, fontdb::Family::Serif],
            ..fontdb::Query::default()
        };
        storage
            .query(&query)
            .map(|(id, _)| id)
            .or_else(|| storage.faces().next().map(|face| face.id))
            .unwrap()
    }

    /// Resolves a glyph of the font it serves while an upload is in progress.
    #[derive(Default)]
    struct ReentrantImages {
        font: Mutex<Option<std::sync::Weak<Font>>>,
        nested: AtomicI32,
    }

    impl ImageFactory for ReentrantImages {
        fn create_alpha_image(&self, width: u32, height: u32, _coverage: &[u8]) -> Result<Image> {
            let font = self.font.lock().as_ref().and_then(std::sync::Weak::upgrade);
            if let Some(font) = font {
                font.glyph(' ');
                self.nested.fetch_add(1, Ordering::SeqCst);
            }
            Ok(Image::from_handle(ImageHandle(1), width, height))
        }
    }

    #[test]
    fn test_glyph_source_default_methods() {
        let font = test_font::FixedFont::new(5.0).with_metrics(-10.0, 3.0);
        assert_eq!(font.ascent(), -10.0);
        assert_eq!(font.descent(), 3.0);

        let glyphs = font.glyphs("a b");
        assert_eq!(glyphs.len(), 3);
        assert!(glyphs[0].image().is_some());
        assert!(glyphs[1].image().is_none());
        assert_eq!(glyphs[2].char(), 'b');
    }

    #[test]
    fn test_system_font_glyphs_are_cached() {
        let mut storage = FontStorage::new();
        let face_id = system_face(&mut storage);

        let images = Arc::new(CountingImages::default());
        let font = Font::new(&mut storage, face_id, 24.0, images.clone()).unwrap();

        assert!(font.ascent() <= 0.0);
        assert!(font.descent() >= 0.0);

        let space = font.glyph(' ');
        assert!(space.image().is_none());
        assert!(space.advance() > 0.0);

        let first = font.glyph('A');
        let created = images.created.load(Ordering::SeqCst);
        let second = font.glyph('A');
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(images.created.load(Ordering::SeqCst), created);
        assert_eq!(first.advance(), first.advance().round());
    }

    #[test]
    fn test_metrics_are_flipped_into_y_down_space() {
        let mut storage = FontStorage::new();
        let face_id = system_face(&mut storage);
        let face = storage.font(face_id).unwrap();

        let font = Font::new(
            &mut storage,
            face_id,
            32.0,
            Arc::new(CountingImages::default()),
        )
        .unwrap();

        let line = face.horizontal_line_metrics(32.0).unwrap();
        assert_eq!(font.ascent(), -line.ascent.round());
        assert_eq!(font.descent(), -line.descent.round());
        assert!(font.ascent() < 0.0);

        let expected = face.metrics('H', 32.0);
        let glyph = font.glyph('H');
        assert_eq!(glyph.offset_x(), expected.xmin as f32);
        assert_eq!(
            glyph.offset_y(),
            (expected.ymin + expected.height as i32) as f32
        );
        assert_eq!(glyph.advance(), expected.advance_width.round());

        let image = glyph.image().unwrap();
        assert_eq!(image.width() as usize, expected.width);
        assert_eq!(image.height() as usize, expected.height);
    }

    #[test]
    fn test_image_factory_may_resolve_glyphs() {
        let mut storage = FontStorage::new();
        let face_id = system_face(&mut storage);

        let images = Arc::new(ReentrantImages::default());
        let font = Arc::new(Font::new(&mut storage, face_id, 24.0, images.clone()).unwrap());
        *images.font.lock() = Some(Arc::downgrade(&font));

        let glyph = font.glyph('W');
        assert!(glyph.image().is_some());
        assert_eq!(images.nested.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&glyph, &font.glyph('W')));
    }

    #[test]
    fn test_invalid_font_size() {
        let mut storage = FontStorage::new();
        let face_id = system_face(&mut storage);

        let images: Arc<dyn ImageFactory> = Arc::new(CountingImages::default());
        for size in [0.0, -4.0, f32::NAN] {
            let result = Font::new(&mut storage, face_id, size, images.clone());
            assert!(matches!(result, Err(BaconError::InvalidFontSize)));
        }
    }
}
