use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ZipperError>;

/// Failures while packing a file into an archive and removing it.
#[derive(Debug, thiserror::Error)]
pub enum ZipperError {
    #[error("could not read source file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create archive {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write archive {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("could not remove source file {path:?}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source path {path:?} is not valid UTF-8 and cannot name an archive entry")]
    EntryName { path: PathBuf },

    #[error("timestamp {timestamp} cannot be stored in an archive entry")]
    Timestamp { timestamp: chrono::NaiveDateTime },
}
