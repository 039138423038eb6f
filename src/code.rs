use crate::frequency::ALPHABET_SIZE;
use crate::tree::{HuffmanNode, HuffmanTree};

/// Symbol -> bit string, read off root-to-leaf paths (left = 0, right = 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Vec<bool>>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Assigns a code to every leaf of `tree`.
    ///
    /// A tree whose root is a leaf has no edges to walk, so its only symbol
    /// gets the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable {
            codes: std::array::from_fn(|_| None),
        };
        match &tree.root {
            HuffmanNode::Leaf { symbol, .. } => table.codes[*symbol as usize] = Some(vec![false]),
            root => {
                let mut path = Vec::new();
                assign(root, &mut path, &mut table.codes);
            }
        }
        table
    }

    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    /// Symbols that have a code, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (symbol as u8, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }
}

fn assign(node: &HuffmanNode, path: &mut Vec<bool>, codes: &mut [Option<Vec<bool>>; ALPHABET_SIZE]) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => codes[*symbol as usize] = Some(path.clone()),
        HuffmanNode::Internal { left, right, .. } => {
            path.push(false);
            assign(left, path, codes);
            path.pop();
            path.push(true);
            assign(right, path, codes);
            path.pop();
        }
    }
}

/// Renders a code as a string of `0` and `1`.
pub fn bit_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prefix_free(table: &CodeTable) -> bool {
        let codes: Vec<&[bool]> = table.iter().map(|(_, c)| c).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j && b.starts_with(a) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn frequent_symbol_gets_shorter_code() {
        let tree = HuffmanTree::from_bytes(b"AABAC").unwrap();
        let codes = CodeTable::from_tree(&tree);

        let a = codes.get(b'A').unwrap();
        let b = codes.get(b'B').unwrap();
        let c = codes.get(b'C').unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
        assert_eq!(c.len(), 2);
        assert!(is_prefix_free(&codes));
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let tree = HuffmanTree::from_bytes(&[0x2a; 10]).unwrap();
        let codes = CodeTable::from_tree(&tree);
        assert_eq!(codes.get(0x2a), Some(&[false][..]));
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn code_length_matches_leaf_depth() {
        let data: Vec<u8> = (0u16..2000).map(|i| (i % 97 * (i % 5)) as u8).collect();
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        let codes = CodeTable::from_tree(&tree);

        assert_eq!(codes.max_len(), tree.depth());
        for (symbol, code) in codes.iter() {
            let mut node = &tree.root;
            for &bit in code {
                node = node.child(bit).unwrap();
            }
            assert_eq!(node, &HuffmanNode::leaf(symbol, node.freq()));
        }
        assert!(is_prefix_free(&codes));
    }

    #[test]
    fn renders_bits() {
        assert_eq!(bit_string(&[true, false, true, true]), "1011");
        assert_eq!(bit_string(&[]), "");
    }
}
