//! Frontier containers: a FIFO queue and a min-priority queue.
//!
//! [`PriorityQueue`] stores entries in a min-heap keyed by
//! `(priority, insertion_order)`. Lower priorities are popped first; ties
//! are broken by insertion order, earliest first. The items themselves are
//! never compared, so node labels play no part in the ordering.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

// ---------------------------------------------------------------------------
// Fifo
// ---------------------------------------------------------------------------

/// First-in first-out queue used by breadth-first traversal.
#[derive(Debug, Clone)]
pub struct Fifo<T> {
    items: VecDeque<T>,
}

impl<T> Fifo<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Append an item at the tail.
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove the item at the head.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Fifo<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// PriorityQueue
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Entry<T, P> {
    item: T,
    priority: P,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

impl<T, P: Ord> PartialEq for Entry<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T, P: Ord> Eq for Entry<T, P> {}

impl<T, P: Ord> PartialOrd for Entry<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, P: Ord> Ord for Entry<T, P> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Wrapped in Reverse inside the heap: smaller priority first, then
        // smaller seq.
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A min-priority queue with insertion-order tie-breaking.
///
/// Items with a lower priority are popped first. Among items with the same
/// priority, those pushed earlier are popped first.
#[derive(Debug)]
pub struct PriorityQueue<T, P = i32> {
    heap: BinaryHeap<Reverse<Entry<T, P>>>,
    seq: u64,
}

impl<T, P: Ord> PriorityQueue<T, P> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Push an item at the given priority.
    pub fn push(&mut self, item: T, priority: P) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            item,
            priority,
            seq,
        }));
    }

    /// Pop the item with the lowest priority (ties broken FIFO).
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|Reverse(entry)| entry.item)
    }

    /// Pop the item with the lowest priority, also returning the priority.
    pub fn pop_with_priority(&mut self) -> Option<(T, P)> {
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.item, entry.priority))
    }

    /// Priority of the item that the next [`pop`](Self::pop) would return.
    pub fn peek_priority(&self) -> Option<&P> {
        self.heap.peek().map(|Reverse(entry)| &entry.priority)
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Remove every item. The tie-break counter keeps running.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T, P: Ord> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
