use std::path::{Component, Path, PathBuf};

use crate::foundation::error::{ShotError, ShotResult};

/// Trim the raw input and expand a leading `~` against `home`.
///
/// Only `~` on its own or followed by a separator is expanded; `~name` is left
/// as a literal segment.
pub(crate) fn expand_home(raw: &str, home: &Path) -> ShotResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ShotError::invalid_path(raw, "path is empty"));
    }
    if trimmed.contains('\0') {
        return Err(ShotError::invalid_path(raw, "path contains a NUL byte"));
    }

    let Some(rest) = trimmed.strip_prefix('~') else {
        return Ok(trimmed.to_string());
    };
    if rest.is_empty() {
        return Ok(home.to_string_lossy().into_owned());
    }
    if rest.starts_with(['/', '\\']) {
        let mut out = home.to_string_lossy().into_owned();
        out.push_str(rest);
        return Ok(out);
    }
    Ok(trimmed.to_string())
}

/// Lexically normalize a path: both `/` and `\` separate segments, `.` is
/// dropped and `..` pops the previous segment.
///
/// `..` never climbs above the root of an absolute path. Leading `..` segments of
/// a relative path are kept.
pub(crate) fn normalize_lexical(input: &str) -> ShotResult<PathBuf> {
    let unified = input.replace('\\', "/");

    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for comp in Path::new(&unified).components() {
        match comp {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(std::path::MAIN_SEPARATOR_STR),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(seg) => {
                out.push(seg);
                depth += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        return Err(ShotError::invalid_path(input, "path normalizes to nothing"));
    }
    Ok(out)
}

/// Returns the single segment of a relative, separator-free path.
pub(crate) fn bare_name(path: &Path) -> Option<&std::ffi::OsStr> {
    let mut comps = path.components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(name)), None) => Some(name),
        _ => None,
    }
}
