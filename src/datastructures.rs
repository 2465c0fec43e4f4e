use bitvec::prelude::*;
use core::mem;
use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Index;

/// Fixed-capacity set over `0..len` backed by a `BitVec`. Used as the region key of the
/// pursuit game and for visited markers.
#[derive(Clone, Default)]
pub struct BitSet {
    cardinality: usize,
    bit_vec: BitVec,
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let values: Vec<_> = self.iter().map(|i| i.to_string()).collect();
        write!(f, "BitSet {{ {} }}", values.join(", "))
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.cardinality == other.cardinality && self.as_slice() == other.as_slice()
    }
}
impl Eq for BitSet {}

impl Hash for BitSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

const fn block_size() -> usize {
    mem::size_of::<usize>() * 8
}

impl BitSet {
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            cardinality: 0,
            bit_vec: bitvec![0; size],
        }
    }

    pub fn from_vertices<I: IntoIterator<Item = usize>>(size: usize, iter: I) -> Self {
        let mut set = Self::new(size);
        for i in iter {
            set.set_bit(i);
        }
        set
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.cardinality == 0
    }

    #[inline]
    pub fn full(&self) -> bool {
        self.cardinality == self.bit_vec.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        self.bit_vec.as_slice()
    }

    /// Returns true if the bit was already set.
    #[inline]
    pub fn set_bit(&mut self, idx: usize) -> bool {
        if self.bit_vec[idx] {
            true
        } else {
            self.bit_vec.set(idx, true);
            self.cardinality += 1;
            false
        }
    }

    /// Returns true if the bit was set before.
    #[inline]
    pub fn unset_bit(&mut self, idx: usize) -> bool {
        if self.bit_vec[idx] {
            self.bit_vec.set(idx, false);
            self.cardinality -= 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bit_vec.len()
    }

    #[inline]
    pub fn is_subset_of(&self, other: &BitSet) -> bool {
        self.cardinality <= other.cardinality
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice().iter())
                .all(|(a, b)| a & !b == 0)
    }

    #[inline]
    pub fn or(&mut self, other: &BitSet) {
        assert_eq!(self.len(), other.len());
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x |= y;
        }
        self.recount();
    }

    #[inline]
    pub fn and_not(&mut self, other: &BitSet) {
        assert_eq!(self.len(), other.len());
        for (x, y) in self
            .bit_vec
            .as_mut_slice()
            .iter_mut()
            .zip(other.as_slice().iter())
        {
            *x &= !y;
        }
        self.recount();
    }

    fn recount(&mut self) {
        self.cardinality = self
            .as_slice()
            .iter()
            .map(|block| block.count_ones() as usize)
            .sum();
    }

    #[inline]
    pub fn get_first_set(&self) -> Option<usize> {
        if self.cardinality == 0 {
            None
        } else {
            self.get_next_set(0)
        }
    }

    #[inline]
    pub fn get_next_set(&self, idx: usize) -> Option<usize> {
        if idx >= self.bit_vec.len() {
            return None;
        }
        let blocks = self.as_slice();
        let mut block_idx = idx / block_size();
        let mut block = blocks[block_idx] & (usize::MAX << (idx % block_size()));
        while block == 0 {
            block_idx += 1;
            if block_idx >= blocks.len() {
                return None;
            }
            block = blocks[block_idx];
        }
        let v = block_idx * block_size() + block.trailing_zeros() as usize;
        if v < self.bit_vec.len() {
            Some(v)
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> BitSetIterator {
        BitSetIterator {
            set: self,
            next: self.get_first_set(),
        }
    }
}

pub struct BitSetIterator<'a> {
    set: &'a BitSet,
    next: Option<usize>,
}

impl<'a> Iterator for BitSetIterator<'a> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.set.get_next_set(current + 1);
        Some(current)
    }
}

impl Index<usize> for BitSet {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        if self.bit_vec[index] {
            &true
        } else {
            &false
        }
    }
}

/// Indexed binary min-heap with priority updates and removal of arbitrary elements.
pub struct BinaryQueue {
    heap: Vec<usize>,
    values: FxHashMap<usize, i64>,
    indices: FxHashMap<usize, usize>,
}

impl Default for BinaryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryQueue {
    pub fn new() -> Self {
        Self {
            heap: Vec::default(),
            values: FxHashMap::default(),
            indices: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn insert(&mut self, element: usize, priority: i64) {
        match self.values.entry(element) {
            Entry::Occupied(mut entry) => {
                entry.insert(priority);
                let idx = self.indices[&element];
                self.up(idx);
                let idx = self.indices[&element];
                self.down(idx);
            }
            Entry::Vacant(entry) => {
                entry.insert(priority);
                self.indices.insert(element, self.heap.len());
                self.heap.push(element);
                self.up(self.heap.len() - 1);
            }
        }
    }

    pub fn remove(&mut self, element: usize) -> Option<i64> {
        let idx = self.indices.remove(&element)?;
        let value = self.values.remove(&element);
        let last = self.heap.pop()?;
        if idx < self.heap.len() {
            self.heap[idx] = last;
            self.indices.insert(last, idx);
            self.up(idx);
            let idx = self.indices[&last];
            self.down(idx);
        }
        value
    }

    pub fn pop_min(&mut self) -> Option<(usize, i64)> {
        let k = *self.heap.first()?;
        let v = self.remove(k)?;
        Some((k, v))
    }

    fn up(&mut self, mut idx: usize) {
        let x = self.heap[idx];
        let value = self.values[&x];
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if value < self.values[&self.heap[parent]] {
                self.heap[idx] = self.heap[parent];
                self.indices.insert(self.heap[idx], idx);
                idx = parent;
            } else {
                break;
            }
        }
        self.heap[idx] = x;
        self.indices.insert(x, idx);
    }

    fn down(&mut self, mut idx: usize) {
        let x = self.heap[idx];
        let value = self.values[&x];
        loop {
            let first = 2 * idx + 1;
            if first >= self.heap.len() {
                break;
            }
            let second = first + 1;
            let child = if second < self.heap.len()
                && self.values[&self.heap[second]] < self.values[&self.heap[first]]
            {
                second
            } else {
                first
            };
            if self.values[&self.heap[child]] < value {
                self.heap[idx] = self.heap[child];
                self.indices.insert(self.heap[idx], idx);
                idx = child;
            } else {
                break;
            }
        }
        self.heap[idx] = x;
        self.indices.insert(x, idx);
    }
}
