use std::cmp::Ordering;
use std::collections::BinaryHeap;

use grid_util::point::Point;

use crate::FxIndexMap;

/// Marks the start node, which has no parent.
pub(crate) const NO_PARENT: usize = usize::MAX;

struct SmallestPriorityHolder {
    priority: f64,
    sequence: u64,
    index: usize,
}

impl Eq for SmallestPriorityHolder {}

impl PartialEq for SmallestPriorityHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestPriorityHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestPriorityHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap: the smallest priority comes out first and among equal
        // priorities the entry that was pushed first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority queue of node indices with first-in-first-out tie-breaking. The same node may
/// be pushed several times; callers skip the stale entries when popping.
#[derive(Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<SmallestPriorityHolder>,
    pushed: u64,
}

impl Frontier {
    pub(crate) fn push(&mut self, index: usize, priority: f64) {
        self.heap.push(SmallestPriorityHolder {
            priority,
            sequence: self.pushed,
            index,
        });
        self.pushed += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|holder| holder.index)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Follows the parent indices from `goal` back to the start and returns the path in driving
/// order.
pub(crate) fn reverse_path(parents: &FxIndexMap<Point, (usize, u64)>, goal: usize) -> Vec<Point> {
    let mut cursor = goal;
    let mut path = std::iter::from_fn(|| {
        parents.get_index(cursor).map(|(node, &(parent, _))| {
            cursor = parent;
            *node
        })
    })
    .collect::<Vec<Point>>();
    path.reverse();
    path
}
