use crate::frequency::{ALPHABET_SIZE, FrequencyTable};
use crate::queue::{PriorityList, Weighted};

/// A node of the Huffman tree. Internal nodes own both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: u8, freq: u64) -> Self {
        HuffmanNode::Leaf { symbol, freq }
    }

    /// Joins two subtrees; `left` is the one popped first.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffmanNode::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } | HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Follows one edge: `false` goes left, `true` goes right. Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }
}

impl Weighted for HuffmanNode {
    fn weight(&self) -> u64 {
        self.freq()
    }
}

/// A Huffman tree with exactly one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffmanNode,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Returns `None` when no symbol has a nonzero count. With a single
    /// distinct symbol the root is that symbol's leaf.
    pub fn from_frequencies(table: &FrequencyTable) -> Option<Self> {
        let mut queue = PriorityList::with_capacity(ALPHABET_SIZE);
        for (symbol, freq) in table.nonzero() {
            queue.insert_sorted(HuffmanNode::leaf(symbol, freq));
        }

        loop {
            let first = queue.pop_min()?;
            match queue.pop_min() {
                Some(second) => queue.insert_sorted(HuffmanNode::merge(first, second)),
                None => return Some(HuffmanTree { root: first }),
            }
        }
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => count += 1,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        count
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        deepest
    }
}
