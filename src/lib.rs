//! # huffpack
//!
//! Huffman file compression with a compact self-describing container.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let input = Path::new("notes.txt");
//! let packed = huffpack::derive_output_name(input);
//! huffpack::compress(input, &packed)?;
//! huffpack::decompress(&packed, Path::new("notes.restored.txt"))?;
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod bits;
pub mod code;
pub mod container;
pub mod error;
pub mod frequency;
pub mod queue;
pub mod report;
pub mod serial;
pub mod tree;
pub mod utils;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, info_span, warn};

pub use container::{CompressReport, DecompressReport, Header, Inspection};
pub use error::{Error, Result};
pub use tree::{HuffmanNode, HuffmanTree};

/// Extension given to compressed files.
pub const COMPRESSED_EXT: &str = "huff";

/// Replaces the extension of `input` with [`COMPRESSED_EXT`], or appends it when there is none.
pub fn derive_output_name(input: &Path) -> PathBuf {
    input.with_extension(COMPRESSED_EXT)
}

/// Compresses the file at `input_path` into a container at `output_path`.
pub fn compress(input_path: &Path, output_path: &Path) -> Result<CompressReport> {
    let span = info_span!("compress", input = %input_path.display());
    let _enter = span.enter();

    let mut input = open_input(input_path)?;
    ensure_distinct(input_path, output_path)?;
    let mut output = create_output(output_path)?;
    let result = container::compress_stream(&mut input, &mut output);
    drop(output);
    let report = cleanup_on_error(result, output_path)?;

    info!(
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        "compressed {} -> {}",
        input_path.display(),
        output_path.display()
    );
    Ok(report)
}

/// Restores the original bytes of the container at `input_path` into `output_path`.
pub fn decompress(input_path: &Path, output_path: &Path) -> Result<DecompressReport> {
    let span = info_span!("decompress", input = %input_path.display());
    let _enter = span.enter();

    let mut input = open_input(input_path)?;
    ensure_distinct(input_path, output_path)?;
    let mut output = create_output(output_path)?;
    let result = container::decompress_stream(&mut input, &mut output);
    drop(output);
    let report = cleanup_on_error(result, output_path)?;

    info!(
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        "decompressed {} -> {}",
        input_path.display(),
        output_path.display()
    );
    Ok(report)
}

/// Parses the header and tree of a container file without decoding its payload.
pub fn inspect(path: &Path) -> Result<Inspection> {
    let mut input = open_input(path)?;
    container::inspect_stream(&mut input)
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let unreadable = |source| Error::InputUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    if !file.metadata().map_err(unreadable)?.is_file() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(BufReader::new(file))
}

/// Refuses to write over the input: creating the output would truncate it before it is read.
fn ensure_distinct(input_path: &Path, output_path: &Path) -> Result<()> {
    // A missing output cannot be the input.
    let Ok(target) = fs::canonicalize(output_path) else {
        return Ok(());
    };
    let source = fs::canonicalize(input_path).map_err(|source| Error::InputUnreadable {
        path: input_path.to_path_buf(),
        source,
    })?;
    if source == target || same_inode(&source, &target) {
        return Err(Error::SameFile { path: source });
    }
    Ok(())
}

/// Hard links resolve to different paths but share device and inode.
#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(_: &Path, _: &Path) -> bool {
    false
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        })
}

/// Removes a partially written output when the operation failed.
fn cleanup_on_error<T>(result: Result<T>, output_path: &Path) -> Result<T> {
    if result.is_err() {
        if let Err(e) = fs::remove_file(output_path) {
            warn!(path = %output_path.display(), error = %e, "could not remove partial output");
        }
    }
    result
}
