use crate::foundation::core::Rgba8Premul;

pub(crate) fn over(dst: Rgba8Premul, src: Rgba8Premul) -> Rgba8Premul {
    let sa = src.0[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src.0[i].saturating_add(mul_div255(u16::from(dst.0[i]), inv));
    }
    Rgba8Premul(out)
}

/// Blend one premultiplied pixel onto a straight-alpha raster at `(x, y)`.
/// Coordinates outside the raster are ignored.
pub(crate) fn blend_pixel(dst: &mut image::RgbaImage, x: i64, y: i64, src: Rgba8Premul) {
    if x < 0 || y < 0 || x >= i64::from(dst.width()) || y >= i64::from(dst.height()) {
        return;
    }
    let px = dst.get_pixel_mut(x as u32, y as u32);
    let blended = over(Rgba8Premul::from_straight(px.0), src);
    px.0 = blended.to_straight();
}

/// Blend a premultiplied RGBA8 layer of `layer_w x layer_h` onto `dst` with its
/// top-left corner at `(x, y)`, clipping to the raster bounds.
pub(crate) fn blend_layer(
    dst: &mut image::RgbaImage,
    layer: &[u8],
    layer_w: u32,
    layer_h: u32,
    x: i64,
    y: i64,
) {
    let expected = layer_w as usize * layer_h as usize * 4;
    if layer.len() != expected {
        tracing::debug!(
            got = layer.len(),
            expected,
            "layer buffer size mismatch, skipping blend"
        );
        return;
    }

    for (i, px) in layer.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let lx = (i as u32 % layer_w) as i64;
        let ly = (i as u32 / layer_w) as i64;
        blend_pixel(
            dst,
            x + lx,
            y + ly,
            Rgba8Premul([px[0], px[1], px[2], px[3]]),
        );
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = Rgba8Premul([10, 20, 30, 40]);
        assert_eq!(over(dst, Rgba8Premul([0, 0, 0, 0])), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let src = Rgba8Premul([255, 0, 0, 255]);
        assert_eq!(over(Rgba8Premul([0, 0, 0, 255]), src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let src = Rgba8Premul([100, 110, 120, 200]);
        assert_eq!(over(Rgba8Premul([0, 0, 0, 0]), src), src);
    }

    #[test]
    fn half_coverage_mixes_towards_src() {
        let out = over(Rgba8Premul([0, 0, 0, 255]), Rgba8Premul([128, 128, 128, 128]));
        assert_eq!(out.0[3], 255);
        assert!((i32::from(out.0[0]) - 128).abs() <= 1);
    }

    #[test]
    fn blend_pixel_clips_out_of_bounds() {
        let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
        let white = Rgba8Premul([255, 255, 255, 255]);
        blend_pixel(&mut img, -1, 0, white);
        blend_pixel(&mut img, 0, 2, white);
        assert!(img.pixels().all(|p| p.0 == [1, 2, 3, 255]));

        blend_pixel(&mut img, 1, 1, white);
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn blend_layer_offsets_and_clips() {
        let mut img = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 0, 255]));
        // 2x2 layer, only the bottom-right texel is set.
        let mut layer = vec![0u8; 16];
        layer[12..16].copy_from_slice(&[255, 255, 255, 255]);

        blend_layer(&mut img, &layer, 2, 2, 1, 1);
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);

        // Entirely off-canvas does nothing and does not panic.
        blend_layer(&mut img, &layer, 2, 2, 5, -9);
    }
}
