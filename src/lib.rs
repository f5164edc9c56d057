//! shotmark stamps screenshots and files them away.
//!
//! A request flows through four stages:
//!
//! - [`PathResolver`] turns a user-typed destination into an absolute directory
//! - [`Annotator`] burns the watermark, timestamp and copyright overlays into the raster
//! - [`Exporter`] serializes the raster as PNG, JPEG or a single-page PDF
//! - [`Orchestrator`] sequences the three and persists the bytes before handing them back
#![forbid(unsafe_code)]

mod foundation;

pub mod annotate;
pub mod assets;
pub mod config;
pub mod encode;
pub mod path;
pub mod pipeline;

pub use crate::foundation::core::Rgb8;
pub use crate::foundation::error::{ShotError, ShotResult};

pub use crate::annotate::{Annotator, OverlayFont, OverlaySpec, TextSize};
pub use crate::assets::ImageAsset;
pub use crate::config::ShotConfig;
pub use crate::encode::{ExportFormat, ExportRequest, ExportResult, Exporter};
pub use crate::path::{
    ExtendedRoots, FilesystemRoots, FixedRoots, PathResolver, PlatformRoots, ResolvedPath,
};
pub use crate::pipeline::{Orchestrator, SavedExport};
