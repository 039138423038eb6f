//! Error types for compress and decompress operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for huffpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while processing one file pair.
#[derive(Debug, Error)]
pub enum Error {
    /// The source file is missing or cannot be opened.
    #[error("cannot read input {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination file cannot be created.
    #[error("cannot write output {}: {source}", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input and output name the same file.
    #[error("input and output are the same file: {}", .path.display())]
    SameFile { path: PathBuf },

    /// The container ended before a required section was complete.
    #[error("truncated container: {0}")]
    Truncated(String),

    /// The container is structurally invalid.
    #[error("malformed container: {0}")]
    Malformed(String),

    /// The header's tree length disagrees with the serialized tree.
    #[error("tree length mismatch: header declares {declared} bytes, tree uses {actual}")]
    TreeLengthMismatch { declared: usize, actual: usize },

    /// The serialized tree does not fit the 13-bit header field.
    #[error("serialized tree is {0} bytes, the header allows at most 8191")]
    TreeTooLarge(usize),

    /// The input was modified between the counting and encoding passes.
    #[error("input changed while compressing: counted {expected} bytes, encoded {actual}")]
    InputChanged { expected: u64, actual: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Maps an early end-of-file into [`Error::Truncated`], passing other I/O errors through.
    pub(crate) fn truncated_on_eof(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated(format!("{what} ended early"))
        } else {
            Error::Io(err)
        }
    }
}
