//! Pre-order tree serialization.
//!
//! An internal node is written as [`INTERNAL_MARKER`] followed by its left and
//! right subtrees. A leaf is its symbol byte, preceded by [`ESCAPE`] when the
//! symbol collides with either reserved byte.

use std::io::{self, Write};

use crate::error::{Error, Result};
use crate::tree::{HuffmanNode, HuffmanTree};

pub const INTERNAL_MARKER: u8 = b'*';
pub const ESCAPE: u8 = b'\\';

/// Deepest tree a 256-symbol alphabet can produce.
pub const MAX_DEPTH: usize = 255;

/// Writes `tree` in pre-order and returns the number of bytes emitted.
pub fn write_tree<W: Write>(tree: &HuffmanTree, out: &mut W) -> io::Result<usize> {
    let bytes = tree_bytes(tree);
    out.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Serialized form of `tree` as a byte vector.
pub fn tree_bytes(tree: &HuffmanTree) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode_node(&tree.root, &mut bytes);
    bytes
}

fn encode_node(node: &HuffmanNode, out: &mut Vec<u8>) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            if *symbol == INTERNAL_MARKER || *symbol == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(*symbol);
        }
        HuffmanNode::Internal { left, right, .. } => {
            out.push(INTERNAL_MARKER);
            encode_node(left, out);
            encode_node(right, out);
        }
    }
}

/// Rebuilds a tree from the front of `bytes`.
///
/// Returns the tree and the number of bytes it occupied. Leaves carry a zero
/// frequency since counts are not stored.
pub fn read_tree(bytes: &[u8]) -> Result<(HuffmanTree, usize)> {
    let mut pos = 0;
    let root = decode_node(bytes, &mut pos, 0)?;
    Ok((HuffmanTree { root }, pos))
}

fn decode_node(bytes: &[u8], pos: &mut usize, depth: usize) -> Result<HuffmanNode> {
    if depth > MAX_DEPTH {
        return Err(Error::Malformed(format!(
            "tree is deeper than {MAX_DEPTH} levels"
        )));
    }
    let byte = next_byte(bytes, pos)?;
    match byte {
        ESCAPE => Ok(HuffmanNode::leaf(next_byte(bytes, pos)?, 0)),
        INTERNAL_MARKER => {
            let left = decode_node(bytes, pos, depth + 1)?;
            let right = decode_node(bytes, pos, depth + 1)?;
            Ok(HuffmanNode::Internal {
                freq: 0,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
        symbol => Ok(HuffmanNode::leaf(symbol, 0)),
    }
}

fn next_byte(bytes: &[u8], pos: &mut usize) -> Result<u8> {
    let byte = bytes
        .get(*pos)
        .copied()
        .ok_or_else(|| Error::Truncated(format!("tree ended after {} bytes", *pos)))?;
    *pos += 1;
    Ok(byte)
}
