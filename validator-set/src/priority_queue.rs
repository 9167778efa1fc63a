//! Max-priority queue with mutable keys.
//!
//! An indexed binary heap: every entry has a stable identity `E` and a key
//! `K` ranked by an explicit comparator. Keeping a position map per entry
//! lets [`PriorityQueue::update_key`] re-heapify a single entry in
//! `O(log n)` after its key changes, which proposer rotation does once per
//! step.
//!
//! The comparator must be a total order. Equal keys are never left to heap
//! layout to break: callers fold a unique tie-breaker into the key.

use std::{cmp::Ordering, collections::HashMap, hash::Hash};

#[derive(Debug, Clone)]
struct Node<E, K> {
    entry: E,
    key: K,
}

/// Max-priority queue keyed by `K` under the comparator `F`.
///
/// "Greater" under `F` means higher priority; [`PriorityQueue::peek_max`]
/// returns the entry whose key compares greatest.
pub struct PriorityQueue<E, K, F>
where
    E: Copy + Eq + Hash,
    F: Fn(&K, &K) -> Ordering,
{
    heap: Vec<Node<E, K>>,
    positions: HashMap<E, usize>,
    cmp: F,
}

impl<E, K, F> PriorityQueue<E, K, F>
where
    E: Copy + Eq + Hash,
    F: Fn(&K, &K) -> Ordering,
{
    pub fn new(cmp: F) -> Self {
        Self::with_capacity(0, cmp)
    }

    pub fn with_capacity(capacity: usize, cmp: F) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, entry: &E) -> bool {
        self.positions.contains_key(entry)
    }

    /// Insert `entry` with `key`. An entry that is already queued keeps its
    /// identity and takes the new key.
    pub fn push(&mut self, entry: E, key: K) {
        if let Some(&pos) = self.positions.get(&entry) {
            self.rekey(pos, key);
            return;
        }
        let pos = self.heap.len();
        self.heap.push(Node { entry, key });
        self.positions.insert(entry, pos);
        self.sift_up(pos);
    }

    /// Entry with the greatest key, without removing it.
    pub fn peek_max(&self) -> Option<&E> {
        self.heap.first().map(|node| &node.entry)
    }

    /// Key of the entry returned by [`PriorityQueue::peek_max`].
    pub fn peek_max_key(&self) -> Option<&K> {
        self.heap.first().map(|node| &node.key)
    }

    /// Remove and return the entry with the greatest key.
    pub fn pop_max(&mut self) -> Option<(E, K)> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let node = self.heap.pop()?;
        self.positions.remove(&node.entry);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((node.entry, node.key))
    }

    /// Replace the key of a queued entry and restore heap order.
    ///
    /// Returns `false` if `entry` is not in the queue.
    pub fn update_key(&mut self, entry: &E, key: K) -> bool {
        let Some(&pos) = self.positions.get(entry) else {
            return false;
        };
        self.rekey(pos, key);
        true
    }

    fn rekey(&mut self, pos: usize, key: K) {
        self.heap[pos].key = key;
        let pos = self.sift_up(pos);
        self.sift_down(pos);
    }

    fn greater(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.heap[a].key, &self.heap[b].key) == Ordering::Greater
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].entry, a);
        self.positions.insert(self.heap[b].entry, b);
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.greater(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = pos.saturating_mul(2).saturating_add(1);
            if left >= len {
                break;
            }
            let right = left.saturating_add(1);
            let mut largest = pos;
            if self.greater(left, largest) {
                largest = left;
            }
            if right < len && self.greater(right, largest) {
                largest = right;
            }
            if largest == pos {
                break;
            }
            self.swap(pos, largest);
            pos = largest;
        }
    }
}
