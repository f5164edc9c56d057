use crate::{
    assets::ImageAsset,
    foundation::error::{ShotError, ShotResult},
};

pub fn decode_image(bytes: &[u8]) -> ShotResult<ImageAsset> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ShotError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ShotError::decode("image has zero width or height"));
    }
    Ok(ImageAsset::from_rgba(rgba))
}
