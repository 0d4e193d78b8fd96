use crate::error::Result;
use crate::native::ImageHandle;

/// An image owned by the native renderer.
///
/// Only the handle and the size in texels are kept on this side; pixel data
/// lives with the native runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Image {
    handle: ImageHandle,
    width: u32,
    height: u32,
}

impl Image {
    /// Wraps a handle the native runtime returned for an image of the given size.
    pub fn from_handle(handle: ImageHandle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }

    pub fn handle(&self) -> ImageHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Creates native images from CPU-side pixel data.
///
/// Fonts use this to upload rasterized glyphs. `coverage` holds one 8-bit
/// alpha value per texel in row-major order.
pub trait ImageFactory: Send + Sync {
    fn create_alpha_image(&self, width: u32, height: u32, coverage: &[u8]) -> Result<Image>;
}
