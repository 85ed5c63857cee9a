use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::node::SearchNode;

struct Entry {
    node: Rc<SearchNode>,
    seq: u64,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap: lower g + h first, then lower h,
        // then whichever was inserted first.
        other
            .node
            .cmp_priority(&self.node)
            .then_with(|| other.node.estimate().cmp(&self.node.estimate()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Open set of one search, ordered by estimated total cost.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Rc<SearchNode>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { node, seq });
    }

    /// Removes the node with the smallest `g + h`.
    pub fn pop(&mut self) -> Option<Rc<SearchNode>> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
