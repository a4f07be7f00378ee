use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in the `modpack-loader` crate.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The archive is missing, corrupt, or its central directory cannot be read.
    /// Raised before any extraction work starts.
    #[error("cannot open archive '{}': {source}", path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Same as [`InstallError::ArchiveOpen`] for archives read from a caller
    /// supplied reader, where there is no path to report.
    #[error("cannot read archive: {source}")]
    ArchiveRead {
        #[source]
        source: zip::result::ZipError,
    },

    /// A single entry's stream could not be opened or failed mid-copy.
    #[error("cannot read archive entry '{entry}': {source}")]
    EntryRead {
        entry: String,
        #[source]
        source: io::Error,
    },

    /// A destination file or directory could not be created or written.
    #[error("cannot write '{}': {source}", path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry would be written outside the destination root once remapped.
    #[error("archive entry '{entry}' resolves outside the destination directory")]
    UnsafePath { entry: String },

    /// The HTTP request for a remote pack failed.
    #[error("download of '{url}' failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered a download request with a non-success status.
    #[error("download of '{url}' failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Invalid configuration (pack catalog, destination policy).
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other I/O error, with the path where it happened.
    #[error("I/O error on path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InstallError::Io { path: path.into(), source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InstallError::DestinationWrite { path: path.into(), source }
    }

    pub(crate) fn read(entry: impl Into<String>, source: io::Error) -> Self {
        InstallError::EntryRead { entry: entry.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
