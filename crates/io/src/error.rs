use std::fmt;
use std::path::{Path, PathBuf};

use rollcall_recon::ReconError;

#[derive(Debug)]
pub enum FileError {
    /// File could not be read.
    Read { path: PathBuf, message: String },
    /// File or directory could not be written.
    Write { path: PathBuf, message: String },
    /// File content is not the expected JSON shape.
    Decode { path: PathBuf, message: String },
    /// Engine-level failure while turning file content into records.
    Recon(ReconError),
}

impl FileError {
    pub(crate) fn read(path: &Path, e: impl fmt::Display) -> Self {
        Self::Read { path: path.to_path_buf(), message: e.to_string() }
    }

    pub(crate) fn write(path: &Path, e: impl fmt::Display) -> Self {
        Self::Write { path: path.to_path_buf(), message: e.to_string() }
    }

    pub(crate) fn decode(path: &Path, e: impl fmt::Display) -> Self {
        Self::Decode { path: path.to_path_buf(), message: e.to_string() }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Decode { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Recon(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FileError {}

impl From<ReconError> for FileError {
    fn from(e: ReconError) -> Self {
        Self::Recon(e)
    }
}

impl From<FileError> for ReconError {
    fn from(e: FileError) -> Self {
        match e {
            FileError::Recon(inner) => inner,
            other => ReconError::Store(other.to_string()),
        }
    }
}
