//! Overlay compositing: watermark, timestamp and copyright burned into the raster.

mod bitmap;
mod composite;
mod font;
mod text;

pub use bitmap::BitmapFont;
pub use font::{FontChoice, OverlayFont, SYSTEM_FONT_CANDIDATES};
pub use text::{ScalableFont, TextBrushRgba8};

use crate::{assets::ImageAsset, foundation::core::Rgb8};

/// Size substituted when a text cannot be measured.
pub const FALLBACK_TEXT_SIZE: TextSize = TextSize {
    width: 100,
    height: 15,
};

/// Distance of the watermark (and the timestamp baseline row) from the bottom
/// and right edges.
pub const WATERMARK_MARGIN: i64 = 15;
/// Distance of the copyright notice and the timestamp from the left/top edges.
pub const EDGE_MARGIN: i64 = 10;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSize {
    pub width: u32,
    pub height: u32,
}

/// Everything drawn on one request's raster.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySpec {
    pub watermark: String,
    pub copyright: String,
    pub timestamp: String,
    pub font: FontChoice,
    pub text_color: Rgb8,
    pub shadow_color: Rgb8,
    /// Shadow displacement from the main copy, `(dx, dy)`.
    pub shadow_offset: (i32, i32),
}

impl OverlaySpec {
    /// Default styling with the timestamp taken from `now`.
    pub fn new<Tz>(
        watermark: impl Into<String>,
        copyright: impl Into<String>,
        now: &chrono::DateTime<Tz>,
    ) -> Self
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            watermark: watermark.into(),
            copyright: copyright.into(),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            font: FontChoice::default(),
            text_color: Rgb8::WHITE,
            shadow_color: Rgb8::BLACK,
            shadow_offset: (1, 1),
        }
    }
}

/// Top-left corners of the main copies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub watermark: (i64, i64),
    pub timestamp: (i64, i64),
    pub copyright: (i64, i64),
}

/// Watermark hugs the bottom-right corner; the timestamp shares its row at the
/// left edge; the copyright sits top-left.
pub fn place(width: u32, height: u32, watermark: TextSize) -> Placement {
    let row = i64::from(height) - i64::from(watermark.height) - WATERMARK_MARGIN;
    Placement {
        watermark: (
            i64::from(width) - i64::from(watermark.width) - WATERMARK_MARGIN,
            row,
        ),
        timestamp: (EDGE_MARGIN, row),
        copyright: (EDGE_MARGIN, EDGE_MARGIN),
    }
}

/// Burns overlays into rasters. Keeps the last loaded font so repeated requests
/// with the same [`FontChoice`] do not reload it.
#[derive(Debug, Default)]
pub struct Annotator {
    loaded: Option<(FontChoice, OverlayFont)>,
}

impl Annotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `font` whenever an [`OverlaySpec`] asks for `choice`, without touching disk.
    pub fn with_font(choice: FontChoice, font: OverlayFont) -> Self {
        Self {
            loaded: Some((choice, font)),
        }
    }

    /// Draw the three overlays. Never fails: font and measurement problems
    /// degrade to the bitmap font and [`FALLBACK_TEXT_SIZE`].
    pub fn annotate(&mut self, image: &mut ImageAsset, spec: &OverlaySpec) -> Placement {
        let font = self.font_for(&spec.font);

        let watermark_size = measure_or_fallback(font, &spec.watermark);
        let timestamp_size = measure_or_fallback(font, &spec.timestamp);
        let copyright_size = measure_or_fallback(font, &spec.copyright);
        tracing::debug!(
            ?watermark_size,
            ?timestamp_size,
            ?copyright_size,
            scalable = font.is_scalable(),
            "measured overlays"
        );

        let placement = place(image.width(), image.height(), watermark_size);
        let (dx, dy) = (
            i64::from(spec.shadow_offset.0),
            i64::from(spec.shadow_offset.1),
        );

        let pixels = image.pixels_mut();
        for (text, (x, y)) in [
            (&spec.watermark, placement.watermark),
            (&spec.timestamp, placement.timestamp),
            (&spec.copyright, placement.copyright),
        ] {
            if text.is_empty() {
                continue;
            }
            font.draw(pixels, x + dx, y + dy, text, spec.shadow_color);
            font.draw(pixels, x, y, text, spec.text_color);
        }

        placement
    }

    fn font_for(&mut self, choice: &FontChoice) -> &mut OverlayFont {
        let stale = !matches!(&self.loaded, Some((loaded, _)) if loaded == choice);
        if stale {
            self.loaded = None;
        }
        let (_, font) = self
            .loaded
            .get_or_insert_with(|| (choice.clone(), OverlayFont::load(choice)));
        font
    }
}

fn measure_or_fallback(font: &mut OverlayFont, text: &str) -> TextSize {
    match font.measure(text) {
        Some((width, height)) => TextSize { width, height },
        None => FALLBACK_TEXT_SIZE,
    }
}
