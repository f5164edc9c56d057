use std::io::Cursor;

use crate::{
    assets::ImageAsset,
    foundation::error::{ShotError, ShotResult},
};

pub const JPEG_QUALITY: u8 = 75;

pub fn encode_png(image: &ImageAsset) -> ShotResult<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .pixels()
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ShotError::encoding("png", e))?;
    Ok(buf)
}

/// JPEG has no alpha channel; alpha is dropped before encoding.
pub fn encode_jpeg(image: &ImageAsset) -> ShotResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(image.pixels().clone()).into_rgb8();
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ShotError::encoding("jpeg", e))?;
    Ok(buf)
}
