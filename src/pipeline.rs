use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    annotate::Annotator,
    assets::ImageAsset,
    config::ShotConfig,
    encode::{ExportFormat, ExportRequest, ExportResult, Exporter},
    foundation::error::{ShotError, ShotResult},
    path::{ExtendedRoots, FilesystemRoots, PathResolver, PlatformRoots, ResolvedPath},
};

/// Outcome of a request whose bytes reached disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedExport {
    pub export: ExportResult,
    pub resolved: ResolvedPath,
    pub saved_to: PathBuf,
}

/// Resolve, annotate, export, persist.
#[derive(Debug)]
pub struct Orchestrator {
    resolver: PathResolver,
    annotator: Annotator,
    exporter: Exporter,
    config: ShotConfig,
}

impl Orchestrator {
    /// Search the platform roots plus `config.extra_roots`.
    pub fn new(config: ShotConfig) -> ShotResult<Self> {
        let roots = ExtendedRoots {
            base: PlatformRoots,
            extra: config.extra_roots.clone(),
        };
        Self::with_roots(config, Box::new(roots))
    }

    pub fn with_roots(config: ShotConfig, roots: Box<dyn FilesystemRoots>) -> ShotResult<Self> {
        config.validate()?;
        let home = config.home_dir()?;
        Ok(Self {
            resolver: PathResolver::new(home, roots)?,
            annotator: Annotator::new(),
            exporter: Exporter::new(),
            config,
        })
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn run(
        &mut self,
        raw_path: &str,
        image: ImageAsset,
        format: &str,
    ) -> ShotResult<SavedExport> {
        self.run_at(raw_path, image, format, &chrono::Local::now())
    }

    /// [`Orchestrator::run`] with an explicit request time.
    #[tracing::instrument(skip(self, image, now), fields(width = image.width(), height = image.height()))]
    pub fn run_at<Tz>(
        &mut self,
        raw_path: &str,
        mut image: ImageAsset,
        format: &str,
        now: &chrono::DateTime<Tz>,
    ) -> ShotResult<SavedExport>
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let resolved = self.resolver.resolve(raw_path)?;

        let spec = self.config.overlay_spec(now);
        self.annotator.annotate(&mut image, &spec);

        let request = ExportRequest::new(ExportFormat::parse(format), now.naive_local());
        let export = self.exporter.export(&image, &request)?;

        let saved_to = persist(resolved.path(), &export)?;
        tracing::info!(path = %saved_to.display(), mime = export.mime(), "saved screenshot");

        Ok(SavedExport {
            export,
            resolved,
            saved_to,
        })
    }
}

/// Create `dir` if needed and write the export into it. A file this call
/// created is removed again if writing into it fails; anything already at the
/// target is left alone when it cannot be opened for writing.
fn persist(dir: &Path, export: &ExportResult) -> ShotResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ShotError::from_io(dir, e))?;

    let target = dir.join(export.filename());
    let file = File::create(&target).map_err(|e| ShotError::from_io(&target, e))?;
    if let Err(e) = write_all(file, export.bytes()) {
        if let Err(rm) = std::fs::remove_file(&target)
            && rm.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %target.display(), error = %rm, "could not remove partial file");
        }
        return Err(ShotError::from_io(&target, e));
    }
    Ok(target)
}

fn write_all(mut file: File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate::OverlayFont, path::FixedRoots};

    fn temp_home(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shotmark_pipe_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn orchestrator(home: &Path) -> Orchestrator {
        let config = ShotConfig {
            home_dir: Some(home.to_path_buf()),
            ..ShotConfig::default()
        };
        let mut o = Orchestrator::with_roots(config, Box::new(FixedRoots::default())).unwrap();
        o.annotator = Annotator::with_font(o.config.font_choice(), OverlayFont::fixed());
        o
    }

    fn now() -> chrono::DateTime<chrono::FixedOffset> {
        chrono::DateTime::parse_from_rfc3339("2025-05-06T07:08:09+00:00").unwrap()
    }

    fn raster() -> ImageAsset {
        ImageAsset::from_rgba(image::RgbaImage::from_pixel(
            240,
            200,
            image::Rgba([40, 80, 120, 255]),
        ))
    }

    #[test]
    fn missing_folder_is_created_and_file_written() {
        let home = temp_home("create");
        let saved = orchestrator(&home)
            .run_at("Shots", raster(), "png", &now())
            .unwrap();

        assert!(!saved.resolved.existed());
        assert_eq!(saved.resolved.path(), home.join("Shots"));
        assert_eq!(
            saved.saved_to,
            home.join("Shots").join("screenshot_20250506_070809.png")
        );
        assert_eq!(std::fs::read(&saved.saved_to).unwrap(), saved.export.bytes());
    }

    #[test]
    fn directory_creation_failure_is_fail_closed() {
        let home = temp_home("blocked");
        std::fs::write(home.join("Blocked"), b"not a dir").unwrap();

        let err = orchestrator(&home)
            .run_at("~/Blocked/inner", raster(), "png", &now())
            .unwrap_err();
        assert!(
            matches!(
                err,
                ShotError::Persistence { .. } | ShotError::PermissionDenied { .. }
            ),
            "{err}"
        );
        assert!(!home.join("Blocked").join("inner").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unopenable_target_is_left_in_place() {
        let home = temp_home("dangling");
        let dir = home.join("Shots");
        std::fs::create_dir_all(&dir).unwrap();
        let target = dir.join("screenshot_20250506_070809.png");
        std::os::unix::fs::symlink(home.join("missing").join("x.png"), &target).unwrap();

        let err = orchestrator(&home)
            .run_at("~/Shots", raster(), "png", &now())
            .unwrap_err();
        assert!(matches!(err, ShotError::Persistence { .. }), "{err}");
        assert!(std::fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
    }

    #[test]
    fn invalid_path_stops_before_export() {
        let home = temp_home("invalid");
        let err = orchestrator(&home)
            .run_at("   ", raster(), "png", &now())
            .unwrap_err();
        assert!(matches!(err, ShotError::InvalidPath { .. }));
        assert_eq!(std::fs::read_dir(&home).unwrap().count(), 0);
    }

    #[test]
    fn annotation_is_visible_in_saved_png() {
        let home = temp_home("visible");
        let saved = orchestrator(&home)
            .run_at("~/out", raster(), "png", &now())
            .unwrap();
        let back = image::load_from_memory(saved.export.bytes())
            .unwrap()
            .to_rgba8();
        assert_eq!(back.dimensions(), (240, 200));
        assert!(back.pixels().any(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn relative_home_override_is_rejected() {
        let config = ShotConfig {
            home_dir: Some(PathBuf::from("rel")),
            ..ShotConfig::default()
        };
        let err = Orchestrator::with_roots(config, Box::new(FixedRoots::default())).unwrap_err();
        assert!(matches!(err, ShotError::Config(_)));
    }
}
