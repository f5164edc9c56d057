use std::path::{Path, PathBuf};

pub type ShotResult<T> = Result<T, ShotError>;

#[derive(thiserror::Error, Debug)]
pub enum ShotError {
    #[error("invalid path '{input}': {reason}")]
    InvalidPath { input: String, reason: String },

    #[error("permission denied: '{}'", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding error ({format}): {message}")]
    Encoding {
        format: &'static str,
        message: String,
    },

    #[error("persistence error: '{}': {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShotError {
    pub fn invalid_path(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn encoding(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Encoding {
            format,
            message: message.to_string(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify a filesystem failure at `path`: access errors become
    /// [`ShotError::PermissionDenied`], everything else [`ShotError::Persistence`].
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::Persistence {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ShotError::invalid_path("..", "x")
                .to_string()
                .contains("invalid path '..'")
        );
        assert!(
            ShotError::encoding("jpeg", "x")
                .to_string()
                .contains("encoding error (jpeg):")
        );
        assert!(ShotError::decode("x").to_string().contains("decode error:"));
        assert!(ShotError::config("x").to_string().contains("config error:"));
    }

    #[test]
    fn io_errors_are_classified_by_kind() {
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = ShotError::from_io(Path::new("/x"), denied);
        assert!(matches!(err, ShotError::PermissionDenied { .. }));

        let full = std::io::Error::other("disk full");
        let err = ShotError::from_io(Path::new("/x/y.png"), full);
        assert!(matches!(err, ShotError::Persistence { .. }));
        assert!(err.to_string().contains("/x/y.png"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ShotError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
