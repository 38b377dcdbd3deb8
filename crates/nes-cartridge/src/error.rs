use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which ROM image an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rom {
    Program,
    Character,
}

impl fmt::Display for Rom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rom::Program => f.write_str("program ROM"),
            Rom::Character => f.write_str("character ROM"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no program ROM supplied")]
    MissingProgram,

    #[error("{rom} is too large: {len} bytes, at most {max}")]
    TooLarge { rom: Rom, len: usize, max: usize },

    #[error("{rom} has an illegal size of {len} bytes")]
    IllegalSize { rom: Rom, len: usize },
}

impl CartridgeError {
    /// Classify an I/O failure on `path`.
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CartridgeError::NotFound { path }
        } else {
            CartridgeError::Io { path, source }
        }
    }
}
