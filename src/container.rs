//! The compressed container: `[2-byte header][serialized tree][payload bits]`.
//!
//! Header layout (big-endian u16): bits 15..13 hold the padding-bit count of
//! the final payload byte, bits 12..0 hold the serialized tree length.

use std::io::{self, Read, Seek, SeekFrom, Write};

use serde::Serialize;
use tracing::debug;

use crate::bits::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::error::{Error, Result};
use crate::frequency::{CHUNK_SIZE, FrequencyTable};
use crate::serial;
use crate::tree::{HuffmanNode, HuffmanTree};

pub const HEADER_LEN: usize = 2;
pub const MAX_TREE_LEN: usize = 0x1FFF;
const PADDING_SHIFT: u16 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub padding_bits: u8,
    pub tree_len: u16,
}

impl Header {
    pub fn new(padding_bits: u8, tree_len: usize) -> Result<Self> {
        if padding_bits > 7 {
            return Err(Error::Malformed(format!(
                "padding of {padding_bits} bits does not fit in a byte"
            )));
        }
        if tree_len > MAX_TREE_LEN {
            return Err(Error::TreeTooLarge(tree_len));
        }
        Ok(Header {
            padding_bits,
            tree_len: tree_len as u16,
        })
    }

    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let packed = (u16::from(self.padding_bits) << PADDING_SHIFT) | self.tree_len;
        packed.to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Self {
        let packed = u16::from_be_bytes(bytes);
        Header {
            padding_bits: (packed >> PADDING_SHIFT) as u8,
            tree_len: packed & MAX_TREE_LEN as u16,
        }
    }
}

/// Outcome of compressing one stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub tree_bytes: usize,
    pub padding_bits: u8,
    pub symbols: usize,
}

impl CompressReport {
    /// Output size relative to input size; 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Outcome of decompressing one stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompressReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub tree_bytes: usize,
    pub padding_bits: u8,
}

/// Header and tree of a container, without its decoded payload.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub header: Header,
    pub tree: Option<HuffmanTree>,
    pub payload_bytes: u64,
}

/// Compresses `input` into `output`.
///
/// The input is read twice: once to count symbols, once to encode them. The
/// header is written last, over a two-byte placeholder.
pub fn compress_stream<R, W>(input: &mut R, output: &mut W) -> Result<CompressReport>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let freqs = FrequencyTable::from_reader(input)?;
    let expected = freqs.total();

    output.write_all(&[0u8; HEADER_LEN])?;

    let Some(tree) = HuffmanTree::from_frequencies(&freqs) else {
        debug!("empty input, writing bare header");
        output.flush()?;
        return Ok(CompressReport {
            input_bytes: 0,
            output_bytes: HEADER_LEN as u64,
            tree_bytes: 0,
            padding_bits: 0,
            symbols: 0,
        });
    };

    let tree_bytes = serial::write_tree(&tree, output)?;
    if tree_bytes > MAX_TREE_LEN {
        return Err(Error::TreeTooLarge(tree_bytes));
    }
    let codes = CodeTable::from_tree(&tree);
    debug!(
        tree_bytes,
        symbols = codes.len(),
        max_code_len = codes.max_len(),
        "built code table"
    );

    input.seek(SeekFrom::Start(0))?;
    let mut bits = BitWriter::new(&mut *output);
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut encoded = 0u64;
    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buffer[..n] {
            let code = codes.get(byte).ok_or_else(|| Error::InputChanged {
                expected,
                actual: encoded + 1,
            })?;
            bits.write_code(code)?;
            encoded += 1;
        }
    }
    if encoded != expected {
        return Err(Error::InputChanged {
            expected,
            actual: encoded,
        });
    }

    let payload_bits = bits.total_bits();
    let (_, padding_bits) = bits.finish()?;
    let header = Header::new(padding_bits, tree_bytes)?;

    output.seek(SeekFrom::Start(0))?;
    output.write_all(&header.to_bytes())?;
    let end = output.seek(SeekFrom::End(0))?;
    output.flush()?;

    debug!(payload_bits, padding_bits, "wrote header");
    Ok(CompressReport {
        input_bytes: encoded,
        output_bytes: end,
        tree_bytes,
        padding_bits,
        symbols: codes.len(),
    })
}

/// Decompresses a container from `input` into `output`.
pub fn decompress_stream<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<DecompressReport> {
    let (header, tree) = read_preamble(input)?;
    let tree_bytes = usize::from(header.tree_len);

    let Some(tree) = tree else {
        let mut rest = [0u8; 1];
        if header.padding_bits != 0 || read_some(input, &mut rest)? != 0 {
            return Err(Error::Malformed("payload present without a tree".into()));
        }
        output.flush()?;
        return Ok(DecompressReport {
            input_bytes: HEADER_LEN as u64,
            output_bytes: 0,
            tree_bytes: 0,
            padding_bits: 0,
        });
    };

    let mut bits = BitReader::new(input, header.padding_bits);
    let written = decode_payload(&tree, &mut bits, output)?;
    if bits.bytes_read() == 0 {
        return Err(Error::Malformed("tree present without a payload".into()));
    }
    output.flush()?;

    Ok(DecompressReport {
        input_bytes: (HEADER_LEN + tree_bytes) as u64 + bits.bytes_read(),
        output_bytes: written,
        tree_bytes,
        padding_bits: header.padding_bits,
    })
}

/// Reads header and tree, then counts the remaining payload bytes without decoding them.
pub fn inspect_stream<R: Read>(input: &mut R) -> Result<Inspection> {
    let (header, tree) = read_preamble(input)?;
    let payload_bytes = io::copy(input, &mut io::sink())?;
    Ok(Inspection {
        header,
        tree,
        payload_bytes,
    })
}

/// Reads the header and exactly `tree_len` tree bytes, checking the tree fills them.
fn read_preamble<R: Read>(input: &mut R) -> Result<(Header, Option<HuffmanTree>)> {
    let mut raw = [0u8; HEADER_LEN];
    input
        .read_exact(&mut raw)
        .map_err(|e| Error::truncated_on_eof(e, "header"))?;
    let header = Header::from_bytes(raw);
    let declared = usize::from(header.tree_len);
    debug!(padding_bits = header.padding_bits, tree_len = declared, "read header");

    if declared == 0 {
        return Ok((header, None));
    }

    let mut tree_data = vec![0u8; declared];
    input
        .read_exact(&mut tree_data)
        .map_err(|e| Error::truncated_on_eof(e, "tree section"))?;
    let (tree, used) = serial::read_tree(&tree_data)?;
    if used != declared {
        return Err(Error::TreeLengthMismatch {
            declared,
            actual: used,
        });
    }
    Ok((header, Some(tree)))
}

/// Walks the tree bit by bit, emitting a symbol at every leaf.
fn decode_payload<R: Read, W: Write>(
    tree: &HuffmanTree,
    bits: &mut BitReader<R>,
    output: &mut W,
) -> Result<u64> {
    let root = &tree.root;
    let mut written = 0u64;

    if let HuffmanNode::Leaf { symbol, .. } = root {
        while let Some(bit) = bits.read_bit()? {
            if bit {
                return Err(Error::Malformed(
                    "set bit in a single-symbol payload".into(),
                ));
            }
            output.write_all(&[*symbol])?;
            written += 1;
        }
        return Ok(written);
    }

    let mut node = root;
    while let Some(bit) = bits.read_bit()? {
        node = node
            .child(bit)
            .ok_or_else(|| Error::Malformed("walked past a leaf".into()))?;
        if let HuffmanNode::Leaf { symbol, .. } = node {
            output.write_all(&[*symbol])?;
            written += 1;
            node = root;
        }
    }
    if !std::ptr::eq(node, root) {
        return Err(Error::Malformed("payload ends inside a code".into()));
    }
    Ok(written)
}

fn read_some<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match input.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
