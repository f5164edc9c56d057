use std::{
    io,
    path::{Path, PathBuf},
};

/// Source of the extra filesystem roots searched after the home-relative
/// candidates (drive letters, mounted volumes).
pub trait FilesystemRoots: Send + Sync {
    /// Roots in search order. Individual inaccessible entries should be left out
    /// rather than reported; an `Err` aborts resolution.
    fn list_roots(&self) -> io::Result<Vec<PathBuf>>;
}

/// A caller-supplied, fixed root list.
#[derive(Clone, Debug, Default)]
pub struct FixedRoots(pub Vec<PathBuf>);

impl FilesystemRoots for FixedRoots {
    fn list_roots(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// `base` roots followed by caller-configured extras.
#[derive(Clone, Debug, Default)]
pub struct ExtendedRoots<R> {
    pub base: R,
    pub extra: Vec<PathBuf>,
}

impl<R: FilesystemRoots> FilesystemRoots for ExtendedRoots<R> {
    fn list_roots(&self) -> io::Result<Vec<PathBuf>> {
        let mut roots = self.base.list_roots()?;
        roots.extend(self.extra.iter().cloned());
        Ok(roots)
    }
}

/// Roots discovered from the running platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformRoots;

impl FilesystemRoots for PlatformRoots {
    #[cfg(windows)]
    fn list_roots(&self) -> io::Result<Vec<PathBuf>> {
        let mut roots: Vec<PathBuf> = (b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
            .filter(|p| p.is_dir())
            .collect();
        let users = PathBuf::from("C:\\Users");
        if users.is_dir() {
            roots.push(users);
        }
        Ok(roots)
    }

    #[cfg(target_os = "macos")]
    fn list_roots(&self) -> io::Result<Vec<PathBuf>> {
        subdirs(Path::new("/Volumes"))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn list_roots(&self) -> io::Result<Vec<PathBuf>> {
        let mut roots = vec![PathBuf::from("/")];
        roots.extend(subdirs(Path::new("/mnt"))?);

        // /media/<volume> on some distros, /media/<user>/<volume> on others.
        for entry in subdirs(Path::new("/media"))? {
            let nested = volume_subdirs(&entry);
            roots.push(entry);
            roots.extend(nested);
        }
        for user_dir in subdirs(Path::new("/run/media"))? {
            roots.extend(volume_subdirs(&user_dir));
        }
        Ok(roots)
    }
}

/// Sorted child directories of `dir`. A missing or unreadable `dir` yields
/// nothing, as do entries whose type cannot be read.
#[cfg(unix)]
fn subdirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if is_skippable(&e) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut out: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    out.sort();
    Ok(out)
}

/// Children of a mounted volume or per-user mount directory. Stale network or
/// FUSE mounts fail with arbitrary errors; those volumes are left out.
#[cfg(all(unix, not(target_os = "macos")))]
fn volume_subdirs(dir: &Path) -> Vec<PathBuf> {
    subdirs(dir).unwrap_or_else(|e| {
        tracing::debug!(path = %dir.display(), error = %e, "skipping unreadable volume");
        Vec::new()
    })
}

#[cfg(unix)]
fn is_skippable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::NotADirectory
    )
}
