//! Errors raised by the driver outside of declaration compilation.

use std::path::PathBuf;

use derive_more::Display;

pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Debug, Display)]
pub enum DriverError {
    #[display("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[display("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[display("failed to scan {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io { source, .. } => Some(source),
            DriverError::Config { source, .. } => Some(source),
            DriverError::Walk { source, .. } => Some(source),
        }
    }
}
