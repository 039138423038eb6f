use std::collections::VecDeque;

/// Anything the priority list can order.
pub trait Weighted {
    fn weight(&self) -> u64;
}

/// Ascending-weight list with stable FIFO ordering among equal weights.
///
/// A new item goes after every existing item whose weight is less than or
/// equal to its own, so the first-inserted item of the lowest weight is
/// always popped first.
#[derive(Debug, Clone)]
pub struct PriorityList<T> {
    items: VecDeque<T>,
}

impl<T: Weighted> PriorityList<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn insert_sorted(&mut self, item: T) {
        let weight = item.weight();
        let at = self.items.partition_point(|existing| existing.weight() <= weight);
        self.items.insert(at, item);
    }

    /// Removes the head, or returns `None` when the list is empty.
    pub fn pop_min(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Weighted> Default for PriorityList<T> {
    fn default() -> Self {
        Self::new()
    }
}
