use std::path::{Path, PathBuf};

use crate::{
    annotate::{bitmap::BitmapFont, text::ScalableFont},
    foundation::core::Rgb8,
};

/// Well-known locations of a plain sans-serif face, tried in order when no
/// explicit font is configured.
#[cfg(windows)]
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

#[cfg(target_os = "macos")]
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Geneva.ttf",
];

#[cfg(all(unix, not(target_os = "macos")))]
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

/// Which font the overlays ask for.
#[derive(Clone, Debug, PartialEq)]
pub struct FontChoice {
    /// Explicit font file; `None` searches [`SYSTEM_FONT_CANDIDATES`].
    pub path: Option<PathBuf>,
    pub size_px: f32,
}

impl Default for FontChoice {
    fn default() -> Self {
        Self {
            path: None,
            size_px: 12.0,
        }
    }
}

/// The best font available for a [`FontChoice`]: a scalable face when one loads,
/// the built-in bitmap font otherwise.
#[derive(Debug)]
pub enum OverlayFont {
    Scalable(Box<ScalableFont>),
    Fixed(BitmapFont),
    /// Draws with the bitmap font but fails every measurement.
    #[cfg(test)]
    Unmeasurable,
}

impl OverlayFont {
    /// Never fails: anything that prevents loading a scalable face degrades to
    /// the bitmap font.
    pub fn load(choice: &FontChoice) -> Self {
        let candidates: Vec<PathBuf> = match &choice.path {
            Some(p) => vec![p.clone()],
            None => SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            if let Some(font) = try_load(path, choice.size_px) {
                tracing::debug!(
                    path = %path.display(),
                    family = font.family_name(),
                    size_px = font.size_px(),
                    "loaded scalable overlay font"
                );
                return Self::Scalable(Box::new(font));
            }
        }

        tracing::warn!("no scalable font available, using built-in bitmap font");
        Self::fixed()
    }

    pub fn from_bytes(font_bytes: Vec<u8>, size_px: f32) -> Self {
        match ScalableFont::from_bytes(font_bytes, size_px) {
            Ok(font) => Self::Scalable(Box::new(font)),
            Err(e) => {
                tracing::warn!(error = %e, "font bytes rejected, using built-in bitmap font");
                Self::fixed()
            }
        }
    }

    pub fn fixed() -> Self {
        Self::Fixed(BitmapFont::default())
    }

    pub fn is_scalable(&self) -> bool {
        matches!(self, Self::Scalable(_))
    }

    /// `None` when the text cannot be measured.
    pub fn measure(&mut self, text: &str) -> Option<(u32, u32)> {
        match self {
            Self::Scalable(font) => match font.measure(text) {
                Ok(size) => Some(size),
                Err(e) => {
                    tracing::debug!(error = %e, "text measurement failed");
                    None
                }
            },
            Self::Fixed(font) => Some(font.measure(text)),
            #[cfg(test)]
            Self::Unmeasurable => None,
        }
    }

    pub(crate) fn draw(
        &mut self,
        dst: &mut image::RgbaImage,
        x: i64,
        y: i64,
        text: &str,
        color: Rgb8,
    ) {
        match self {
            Self::Scalable(font) => {
                if let Err(e) = font.draw(dst, x, y, text, color) {
                    tracing::debug!(error = %e, "scalable draw failed, using bitmap font");
                    BitmapFont::default().draw(dst, x, y, text, color);
                }
            }
            Self::Fixed(font) => font.draw(dst, x, y, text, color),
            #[cfg(test)]
            Self::Unmeasurable => BitmapFont::default().draw(dst, x, y, text, color),
        }
    }
}

fn try_load(path: &Path, size_px: f32) -> Option<ScalableFont> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "font not readable");
            return None;
        }
    };
    match ScalableFont::from_bytes(bytes, size_px) {
        Ok(font) => Some(font),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "font rejected");
            None
        }
    }
}
