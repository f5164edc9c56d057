//! The raster owned by one request.

mod decode;

pub use decode::decode_image;

/// A decoded raster: straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageAsset {
    pixels: image::RgbaImage,
}

impl ImageAsset {
    pub fn from_rgba(pixels: image::RgbaImage) -> Self {
        Self { pixels }
    }

    /// Decode PNG/JPEG/... bytes into a raster.
    pub fn decode(bytes: &[u8]) -> crate::ShotResult<Self> {
        decode_image(bytes)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut image::RgbaImage {
        &mut self.pixels
    }
}
