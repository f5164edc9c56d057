use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{ShotError, ShotResult},
    path::{
        normalize::{bare_name, expand_home, normalize_lexical},
        roots::FilesystemRoots,
    },
};

/// Home-relative folders searched, in order, right after home itself.
pub const HOME_CANDIDATES: [&str; 3] = ["Downloads", "Desktop", "Documents"];

/// An absolute target directory, and whether it already existed when resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    existed: bool,
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn existed(&self) -> bool {
        self.existed
    }
}

/// Turns user-typed destinations into absolute directories.
///
/// Resolution is a pure query: nothing is created on disk.
pub struct PathResolver {
    home: PathBuf,
    roots: Box<dyn FilesystemRoots>,
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("home", &self.home)
            .finish_non_exhaustive()
    }
}

impl PathResolver {
    pub fn new(home: impl Into<PathBuf>, roots: Box<dyn FilesystemRoots>) -> ShotResult<Self> {
        let home = home.into();
        if !home.is_absolute() {
            return Err(ShotError::config(format!(
                "home directory must be absolute, got '{}'",
                home.display()
            )));
        }
        Ok(Self { home, roots })
    }

    pub fn resolve(&self, raw: &str) -> ShotResult<ResolvedPath> {
        let expanded = expand_home(raw, &self.home)?;
        let normalized = normalize_lexical(&expanded)?;

        if normalized.is_absolute() {
            return Ok(existing_or_not(normalized));
        }

        if let Some(name) = bare_name(&normalized) {
            return self.locate_bare(name);
        }
        if normalized == Path::new("..") {
            return Err(ShotError::invalid_path(raw, "'..' does not name a folder"));
        }

        let joined = self.home.join(&normalized);
        let normalized = normalize_lexical(&joined.to_string_lossy())?;
        Ok(existing_or_not(normalized))
    }

    /// Parents searched for a bare folder name: home, the usual home folders,
    /// then the platform roots. Duplicates keep their first position.
    pub fn candidate_parents(&self) -> ShotResult<Vec<PathBuf>> {
        let mut out = self.home_parents();
        let roots = self
            .roots
            .list_roots()
            .map_err(|e| enumeration_error(&self.home, e))?;
        push_unique(&mut out, roots);
        Ok(out)
    }

    fn home_parents(&self) -> Vec<PathBuf> {
        let mut out = vec![self.home.clone()];
        out.extend(HOME_CANDIDATES.iter().map(|c| self.home.join(c)));
        out
    }

    /// Home folders are probed before the roots are enumerated, so a broken
    /// volume cannot hide a match under home. An access error while listing
    /// roots is reported; any other listing failure skips the roots.
    fn locate_bare(&self, name: &std::ffi::OsStr) -> ShotResult<ResolvedPath> {
        let home_parents = self.home_parents();
        if let Some(found) = first_child_dir(&home_parents, name) {
            return Ok(found);
        }

        let roots = match self.roots.list_roots() {
            Ok(roots) => roots,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(enumeration_error(&self.home, e));
            }
            Err(e) => {
                tracing::warn!(error = %e, "filesystem roots unavailable, searching home only");
                Vec::new()
            }
        };
        let mut all = home_parents;
        let searched = all.len();
        push_unique(&mut all, roots);
        if let Some(found) = first_child_dir(&all[searched..], name) {
            return Ok(found);
        }

        let fallback = self.home.join(name);
        tracing::info!(
            folder = %name.to_string_lossy(),
            path = %fallback.display(),
            "folder not found in search locations, will create"
        );
        Ok(ResolvedPath {
            path: fallback,
            existed: false,
        })
    }
}

fn push_unique(out: &mut Vec<PathBuf>, more: Vec<PathBuf>) {
    for p in more {
        if !out.contains(&p) {
            out.push(p);
        }
    }
}

fn first_child_dir(parents: &[PathBuf], name: &std::ffi::OsStr) -> Option<ResolvedPath> {
    for parent in parents {
        let candidate = parent.join(name);
        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_dir() => {
                tracing::info!(
                    folder = %name.to_string_lossy(),
                    path = %candidate.display(),
                    "found existing folder"
                );
                return Some(ResolvedPath {
                    path: candidate,
                    existed: true,
                });
            }
            Ok(_) => {
                tracing::debug!(path = %candidate.display(), "candidate is not a directory");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::debug!(
                    path = %candidate.display(),
                    error = %e,
                    "skipping inaccessible candidate"
                );
            }
        }
    }
    None
}

fn existing_or_not(path: PathBuf) -> ResolvedPath {
    let existed = path.is_dir();
    ResolvedPath { path, existed }
}

fn enumeration_error(home: &Path, e: io::Error) -> ShotError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        ShotError::PermissionDenied {
            path: home.to_path_buf(),
            source: e,
        }
    } else {
        ShotError::Other(anyhow::Error::new(e).context("enumerate filesystem roots"))
    }
}
