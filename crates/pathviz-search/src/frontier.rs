//! Indexed min-priority frontier shared by the best-first strategies.
//!
//! Entries live in a min-heap keyed by `(key, first_insertion_order)`.
//! Lower keys are popped first; ties are broken by the order in which a
//! cell first entered the frontier (FIFO), which is what a stable sort of
//! an append-only open list gives. Lowering a key pushes a fresh entry and
//! leaves the old one to be skipped as stale.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry<K> {
    key: K,
    /// Order of first insertion of `idx`; stable across key updates.
    seq: u64,
    idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot<K> {
    Unseen,
    Open { key: K, seq: u64 },
    Closed,
}

pub(crate) struct OpenSet<K> {
    heap: BinaryHeap<Reverse<Entry<K>>>,
    slots: Vec<Slot<K>>,
    seq: u64,
}

impl<K: Ord + Copy> OpenSet<K> {
    /// Create a frontier over `len` cell indices.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            slots: vec![Slot::Unseen; len],
            seq: 0,
        }
    }

    /// Insert `idx` or update its key. Closed cells are refused.
    ///
    /// Returns `true` if this was the first insertion of `idx`.
    pub(crate) fn push(&mut self, idx: usize, key: K) -> bool {
        let Some(slot) = self.slots.get_mut(idx) else {
            return false;
        };
        let (seq, fresh) = match *slot {
            Slot::Closed => return false,
            Slot::Open { seq, .. } => (seq, false),
            Slot::Unseen => {
                let seq = self.seq;
                self.seq += 1;
                (seq, true)
            }
        };
        *slot = Slot::Open { key, seq };
        self.heap.push(Reverse(Entry { key, seq, idx }));
        fresh
    }

    /// Pop the open cell with the lowest key and close it.
    pub(crate) fn pop(&mut self) -> Option<(usize, K)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            match self.slots[entry.idx] {
                Slot::Open { key, .. } if key == entry.key => {
                    self.slots[entry.idx] = Slot::Closed;
                    return Some((entry.idx, entry.key));
                }
                // Superseded by a later key update, or already closed.
                _ => continue,
            }
        }
        None
    }

    #[inline]
    pub(crate) fn is_closed(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Slot::Closed))
    }

    #[inline]
    pub(crate) fn is_open(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Slot::Open { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_key_first() {
        let mut q = OpenSet::new(4);
        q.push(0, 3);
        q.push(1, 1);
        q.push(2, 2);
        assert_eq!(q.pop(), Some((1, 1)));
        assert_eq!(q.pop(), Some((2, 2)));
        assert_eq!(q.pop(), Some((0, 3)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn ties_follow_first_insertion() {
        let mut q = OpenSet::new(5);
        q.push(3, 5);
        q.push(1, 5);
        q.push(4, 5);
        let order: Vec<usize> = std::iter::from_fn(|| q.pop().map(|(i, _)| i)).collect();
        assert_eq!(order, vec![3, 1, 4]);
    }

    #[test]
    fn key_update_keeps_original_position() {
        let mut q = OpenSet::new(3);
        assert!(q.push(0, 4));
        assert!(q.push(1, 2));
        assert!(!q.push(0, 2));
        // Same key as 1, but 0 entered first.
        assert_eq!(q.pop(), Some((0, 2)));
        assert_eq!(q.pop(), Some((1, 2)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn closed_cells_are_refused() {
        let mut q = OpenSet::new(2);
        q.push(0, 1);
        assert!(q.is_open(0));
        assert_eq!(q.pop(), Some((0, 1)));
        assert!(q.is_closed(0));
        assert!(!q.push(0, 0));
        assert_eq!(q.pop(), None);
        assert!(!q.is_open(1));
        assert!(!q.is_closed(1));
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut q: OpenSet<i32> = OpenSet::new(1);
        assert!(!q.push(7, 1));
        assert_eq!(q.pop(), None);
    }
}
