//! Frontier disciplines: LIFO stack, FIFO queue, and min-priority queue.
//!
//! All three sit behind the [`Frontier`] trait so the search loop is written
//! once. Snapshots are value copies taken in the order an observer would
//! read the container: stack bottom→top, queue head→tail, priority queue in
//! pop order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::node::{FrontierKey, SearchNodeV1};
use crate::trace::FrontierSnapshotEntryV1;

/// A container of pending search nodes.
pub trait Frontier {
    /// Add a node. The frontier never deduplicates.
    fn push(&mut self, node: SearchNodeV1);

    /// Remove the next node according to the discipline.
    fn pop(&mut self) -> Option<SearchNodeV1>;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Whether the frontier is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Independent copy of the current contents, in observer order.
    fn snapshot(&self) -> Vec<FrontierSnapshotEntryV1>;

    /// Largest size the frontier has reached.
    fn high_water(&self) -> u64;
}

fn bump(high_water: &mut u64, len: usize) {
    let size = len as u64;
    if size > *high_water {
        *high_water = size;
    }
}

/// LIFO frontier for depth-first search.
#[derive(Debug, Default)]
pub struct StackFrontier {
    items: Vec<SearchNodeV1>,
    high_water: u64,
}

impl StackFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for StackFrontier {
    fn push(&mut self, node: SearchNodeV1) {
        self.items.push(node);
        bump(&mut self.high_water, self.items.len());
    }

    fn pop(&mut self) -> Option<SearchNodeV1> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn snapshot(&self) -> Vec<FrontierSnapshotEntryV1> {
        self.items
            .iter()
            .map(FrontierSnapshotEntryV1::unscored)
            .collect()
    }

    fn high_water(&self) -> u64 {
        self.high_water
    }
}

/// FIFO frontier for breadth-first search.
#[derive(Debug, Default)]
pub struct QueueFrontier {
    items: VecDeque<SearchNodeV1>,
    high_water: u64,
}

impl QueueFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for QueueFrontier {
    fn push(&mut self, node: SearchNodeV1) {
        self.items.push_back(node);
        bump(&mut self.high_water, self.items.len());
    }

    fn pop(&mut self) -> Option<SearchNodeV1> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn snapshot(&self) -> Vec<FrontierSnapshotEntryV1> {
        self.items
            .iter()
            .map(FrontierSnapshotEntryV1::unscored)
            .collect()
    }

    fn high_water(&self) -> u64 {
        self.high_water
    }
}

/// A frontier entry wrapping a node with its ordering key.
///
/// `BinaryHeap` is a max-heap, so we use `Reverse<FrontierKey>` to get
/// min-heap behavior (lowest `f_cost` first).
#[derive(Debug)]
struct PriorityEntry {
    key: Reverse<FrontierKey>,
    node: SearchNodeV1,
}

impl PartialEq for PriorityEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PriorityEntry {}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-priority frontier for A*, ordered by [`FrontierKey`].
///
/// No decrease-key: the same node may sit in the heap several times with
/// different costs. Stale entries are discarded by the caller's closed check.
#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<PriorityEntry>,
    high_water: u64,
}

impl PriorityFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, node: SearchNodeV1) {
        self.heap.push(PriorityEntry {
            key: Reverse(FrontierKey::from(&node)),
            node,
        });
        bump(&mut self.high_water, self.heap.len());
    }

    fn pop(&mut self) -> Option<SearchNodeV1> {
        self.heap.pop().map(|e| e.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn snapshot(&self) -> Vec<FrontierSnapshotEntryV1> {
        let mut entries: Vec<&PriorityEntry> = self.heap.iter().collect();
        entries.sort_by(|a, b| a.key.0.cmp(&b.key.0));
        entries
            .into_iter()
            .map(|e| FrontierSnapshotEntryV1::scored(&e.node))
            .collect()
    }

    fn high_water(&self) -> u64 {
        self.high_water
    }
}
