//! Errors from loading and saving `config.ron`.

use std::path::PathBuf;

/// A config file operation that failed, with the file it was working on.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid `Config` in RON.
    #[error("failed to parse {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}

impl ConfigError {
    /// The config file involved, when the failure touched the filesystem.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ReadError { path, .. }
            | Self::WriteError { path, .. }
            | Self::ParseError { path, .. } => Some(path),
            Self::SerializeError(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_file() {
        let err = ConfigError::ReadError {
            path: PathBuf::from("/etc/planetoid/config.ron"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/etc/planetoid/config.ron"));
        assert_eq!(
            err.path(),
            Some(std::path::Path::new("/etc/planetoid/config.ron"))
        );
    }
}
