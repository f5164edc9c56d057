//! Container encoders for annotated rasters.
//!
//! An [`Exporter`] turns an [`ImageAsset`] into PNG, JPEG or single-page PDF bytes
//! plus the filename and MIME type they should be stored under.

/// Single-page PDF wrapping of a PNG buffer.
pub mod pdf;
/// PNG and JPEG encoding through the `image` crate.
pub mod raster;

use crate::{assets::ImageAsset, foundation::error::ShotResult};

/// Timestamp layout embedded in export filenames.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Requested output container.
///
/// Parsing never fails: unknown names become [`ExportFormat::Unrecognized`], which
/// exports exactly like [`ExportFormat::Png`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
    Unrecognized(String),
}

impl ExportFormat {
    /// Case-insensitive, surrounding whitespace ignored. `jpg` and `jpeg` are aliases.
    pub fn parse(raw: &str) -> Self {
        let norm = raw.trim().to_ascii_lowercase();
        match norm.as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "pdf" => Self::Pdf,
            _ => {
                tracing::debug!(requested = raw, "unrecognized export format, using png");
                Self::Unrecognized(raw.to_string())
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
            Self::Png | Self::Unrecognized(_) => "png",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
            Self::Png | Self::Unrecognized(_) => "image/png",
        }
    }
}

/// What to encode and when it was requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// Local wall-clock time of the request; drives the filename.
    pub timestamp: chrono::NaiveDateTime,
}

impl ExportRequest {
    pub fn new(format: ExportFormat, timestamp: chrono::NaiveDateTime) -> Self {
        Self { format, timestamp }
    }

    pub fn filename(&self) -> String {
        format!(
            "screenshot_{}.{}",
            self.timestamp.format(FILENAME_TIMESTAMP_FORMAT),
            self.format.extension()
        )
    }
}

/// Encoded bytes ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportResult {
    bytes: Vec<u8>,
    filename: String,
    mime: &'static str,
}

impl ExportResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

/// Stateless encoder front.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn export(&self, image: &ImageAsset, request: &ExportRequest) -> ShotResult<ExportResult> {
        let bytes = match &request.format {
            ExportFormat::Jpeg => raster::encode_jpeg(image)?,
            ExportFormat::Pdf => pdf::wrap_png(&raster::encode_png(image)?)?,
            ExportFormat::Png | ExportFormat::Unrecognized(_) => raster::encode_png(image)?,
        };
        let result = ExportResult {
            bytes,
            filename: request.filename(),
            mime: request.format.mime(),
        };
        tracing::debug!(
            filename = result.filename,
            mime = result.mime,
            len = result.bytes.len(),
            "encoded export"
        );
        Ok(result)
    }
}
