use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure to analyze one input
#[derive(Debug, Error)]
pub enum Error {
    #[error("error reading file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error parsing file {}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("error walking directory: {0}")]
    Walk(#[from] walkdir::Error),
}
