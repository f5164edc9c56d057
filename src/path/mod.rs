//! Destination path resolution.

mod normalize;
mod resolve;
mod roots;

pub use resolve::{HOME_CANDIDATES, PathResolver, ResolvedPath};
pub use roots::{ExtendedRoots, FilesystemRoots, FixedRoots, PlatformRoots};
