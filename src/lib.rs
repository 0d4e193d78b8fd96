//! # Bacon
//!
//! Runtime core for small 2D games: text layout and batched drawing.
//!
//! ## Overview
//!
//! Drawing calls made during a frame are recorded into a
//! [`CommandBuffer`] and handed to the native renderer in one call when the
//! frame ends. Text is shaped into [`text::GlyphRun`]s, broken into lines and
//! positioned by a [`text::GlyphLayout`], and drawn by recording one image
//! draw per glyph.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bacon::text::{self, GlyphLayout, GlyphRun, LayoutParams, Overflow, Style};
//! use bacon::{CommandBuffer, Font, FontStorage, GlyphSource, Image, ImageFactory};
//!
//! # struct Uploader;
//! # impl ImageFactory for Uploader {
//! #     fn create_alpha_image(&self, w: u32, h: u32, _: &[u8]) -> bacon::Result<Image> {
//! #         Ok(Image::from_handle(bacon::native::ImageHandle(1), w, h))
//! #     }
//! # }
//! // 1. Load a font
//! let mut storage = FontStorage::new();
//! storage.load_system_fonts();
//! let query = bacon::fontdb::Query::default();
//! let font: Arc<dyn GlyphSource> =
//!     Arc::new(Font::from_query(&mut storage, &query, 24.0, Arc::new(Uploader)).unwrap());
//!
//! // 2. Build and lay out the text
//! let run = GlyphRun::new(Style::new(font).with_color([1.0, 0.5, 0.0, 1.0]), "Hello, Bacon!");
//! let layout = GlyphLayout::with_params(
//!     [run],
//!     LayoutParams {
//!         width: Some(120.0),
//!         overflow: Overflow::Wrap,
//!         ..LayoutParams::default()
//!     },
//! );
//!
//! // 3. Record the drawing; flush once per frame
//! let mut commands = CommandBuffer::new();
//! text::draw_glyph_layout(&mut commands, &layout);
//! ```
//!
//! ## Features
//!
//! *   **Lazy Layout**: Lines are recomputed only after a parameter actually changed.
//! *   **Word and Character Wrapping**: Breaks at spaces and zero-width spaces, with a character fallback.
//! *   **Batched Commands**: One native call per frame, integers and floats in separate streams.
//! *   **Font Management**: Easy loading of system fonts and custom font files.

pub mod commands;
pub mod error;
pub mod font;
pub mod font_storage;
pub mod game;
pub mod image;
pub mod native;
pub mod text;

// common re-exports
pub use commands::{Color, CommandBuffer, CommandExecutor};
pub use error::{BaconError, Result};
pub use font::{Font, FontMetrics, Glyph, GlyphSource};
pub use font_storage::FontStorage;
pub use game::{Context, FrameDriver, Game};
pub use image::{Image, ImageFactory};

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
