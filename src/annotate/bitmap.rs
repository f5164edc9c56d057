//! Built-in fixed-size font used when no scalable font can be loaded.
//!
//! Glyphs are 5x7 cells stored column-major, bit 0 at the top row, drawn at an
//! integer scale with one blank column between characters.

use crate::{annotate::composite::blend_pixel, foundation::core::Rgb8};

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const ADVANCE: u32 = GLYPH_W + 1;

const FIRST: u32 = 0x20;

#[rustfmt::skip]
const ASCII: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

const COPYRIGHT: [u8; 5] = [0x3E, 0x5D, 0x55, 0x55, 0x3E];
const REPLACEMENT: [u8; 5] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

fn glyph(c: char) -> &'static [u8; 5] {
    let code = u32::from(c);
    match c {
        '\u{00A9}' => &COPYRIGHT,
        _ if (FIRST..FIRST + ASCII.len() as u32).contains(&code) => {
            &ASCII[(code - FIRST) as usize]
        }
        _ => &REPLACEMENT,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self { scale: 2 }
    }
}

impl BitmapFont {
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    /// Ink box of a single line: `chars * 6 - 1` cells wide, 7 cells high.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let n = text.chars().count() as u32;
        if n == 0 {
            return (0, 0);
        }
        ((n * ADVANCE - 1) * self.scale, GLYPH_H * self.scale)
    }

    pub(crate) fn draw(&self, dst: &mut image::RgbaImage, x: i64, y: i64, text: &str, color: Rgb8) {
        let paint = color.premul_opaque();
        let s = i64::from(self.scale);
        for (i, c) in text.chars().enumerate() {
            let origin_x = x + i as i64 * i64::from(ADVANCE) * s;
            for (col, bits) in glyph(c).iter().enumerate() {
                for row in 0..GLYPH_H {
                    if (*bits >> row) & 1 == 0 {
                        continue;
                    }
                    let px = origin_x + col as i64 * s;
                    let py = y + i64::from(row) * s;
                    for dy in 0..s {
                        for dx in 0..s {
                            blend_pixel(dst, px + dx, py + dy, paint);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_scales_with_char_count() {
        let f = BitmapFont::with_scale(1);
        assert_eq!(f.measure(""), (0, 0));
        assert_eq!(f.measure("a"), (5, 7));
        assert_eq!(f.measure("abc"), (17, 7));
        assert_eq!(BitmapFont::with_scale(2).measure("abc"), (34, 14));
    }

    #[test]
    fn scale_zero_is_clamped() {
        assert_eq!(BitmapFont::with_scale(0).measure("a"), (5, 7));
    }

    #[test]
    fn glyph_lookup_covers_ascii_copyright_and_unknown() {
        assert_eq!(glyph(' '), &[0; 5]);
        assert_eq!(glyph('~'), &ASCII[94]);
        assert_eq!(glyph('©'), &COPYRIGHT);
        assert_eq!(glyph('é'), &REPLACEMENT);
    }

    #[test]
    fn draw_paints_inside_measured_box_only() {
        let f = BitmapFont::with_scale(1);
        let mut img = image::RgbaImage::from_pixel(20, 12, image::Rgba([0, 0, 0, 255]));
        f.draw(&mut img, 2, 3, "H1", Rgb8::WHITE);

        let (w, h) = f.measure("H1");
        let mut painted = 0;
        for (x, y, p) in img.enumerate_pixels() {
            if p.0 == [255, 255, 255, 255] {
                painted += 1;
                assert!((2..2 + w).contains(&x) && (3..3 + h).contains(&y), "({x},{y})");
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn draw_clips_at_edges() {
        let f = BitmapFont::default();
        let mut img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        f.draw(&mut img, -3, -5, "WWWW", Rgb8::WHITE);
        f.draw(&mut img, 3, 3, "WWWW", Rgb8::WHITE);
    }
}
