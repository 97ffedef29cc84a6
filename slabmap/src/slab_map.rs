//! see [`SlabMap`]

use core::{fmt, ops};

use alloc::{collections::TryReserveError, vec::Vec};

use crate::{
    entry::{Entry, INVALID_INDEX},
    iter::{Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut},
};

mod compact;

/// A map from `usize` keys to values, where the keys are chosen by the map on insertion
///
/// Keys stay valid until their value is removed, no matter how many other entries are inserted
/// or removed in the meantime. Removed slots are reused by later insertions.
///
/// Vacant slots are threaded into a free list. Removing a value in the middle of the map pushes
/// its slot onto the free list, and removing the last value simply shrinks the map.
/// [`SlabMap::optimize`] (and [`SlabMap::retain`]) rewrite every contiguous run of vacant slots
/// into a single head/tail pair, so that both the free list and iteration can step over a run
/// in O(1) regardless of how long it is.
///
/// ```
/// use slabmap::SlabMap;
///
/// let mut map = SlabMap::new();
/// let a = map.insert("a");
/// let b = map.insert("b");
///
/// assert_eq!(map.remove(a), Some("a"));
/// assert_eq!(map.get(a), None);
/// assert_eq!(map[b], "b");
/// ```
#[derive(Clone)]
pub struct SlabMap<T> {
    entries: Vec<Entry<T>>,
    next_vacant_idx: usize,
    len: usize,
    non_optimized: usize,
}

/// A vacant slot into the [`SlabMap`], created via [`SlabMap::vacant_slot`]
///
/// Dropping this without calling [`VacantSlot::insert`] leaves the map untouched
pub struct VacantSlot<'a, T> {
    map: &'a mut SlabMap<T>,
    key: usize,
}

impl<T> VacantSlot<'_, T> {
    /// Get the key that will be associated with this slot once it is filled
    #[inline]
    pub fn key(&self) -> usize {
        self.key
    }

    /// Insert an element into this slot
    #[inline]
    pub fn insert(self, value: T) {
        self.map.fill(self.key, value);
    }
}

#[cold]
#[inline(never)]
fn access_vacant_key(key: usize) -> ! {
    panic!("Tried to access vacant key: {key}")
}

#[cold]
#[inline(never)]
fn free_list_corrupted(index: usize) -> ! {
    panic!("free list points at occupied slot: {index}")
}

impl<T> SlabMap<T> {
    /// Create a new, empty [`SlabMap`]
    ///
    /// This doesn't allocate until the first insertion
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_vacant_idx: INVALID_INDEX,
            len: 0,
            non_optimized: 0,
        }
    }

    /// Create a new, empty [`SlabMap`] that can hold at least `capacity` elements
    /// without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// The number of slots that the backing storage can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Get the number of elements in the [`SlabMap`]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no elements in the [`SlabMap`]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    // vacant slots are reused before the storage grows, so they count towards `additional`
    fn entries_additional(&self, additional: usize) -> usize {
        additional.saturating_sub(self.entries.len() - self.len)
    }

    /// Reserve space for at least `additional` more insertions
    ///
    /// Vacant slots count towards `additional`, so this may not allocate at all.
    /// This never shrinks the storage and never moves any keys.
    pub fn reserve(&mut self, additional: usize) {
        let additional = self.entries_additional(additional);
        self.entries.reserve(additional);
    }

    /// Like [`SlabMap::reserve`], but doesn't speculatively over-allocate
    pub fn reserve_exact(&mut self, additional: usize) {
        let additional = self.entries_additional(additional);
        self.entries.reserve_exact(additional);
    }

    /// Like [`SlabMap::reserve`], but returns an error instead of aborting if the
    /// allocation fails
    ///
    /// On error the map is left unchanged
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let additional = self.entries_additional(additional);
        self.entries.try_reserve(additional)
    }

    /// Get a reference to the value associated with the key
    ///
    /// Returns None if the key is out of bounds or if the slot is vacant
    #[inline]
    pub fn get(&self, key: usize) -> Option<&T> {
        self.entries.get(key)?.value()
    }

    /// Get a mutable reference to the value associated with the key
    ///
    /// Returns None if the key is out of bounds or if the slot is vacant
    #[inline]
    pub fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.entries.get_mut(key)?.value_mut()
    }

    /// Returns true if the key is associated with a value
    #[inline]
    pub fn contains_key(&self, key: usize) -> bool {
        self.get(key).is_some()
    }

    /// Access the vacant slot that the next insertion will fill
    pub fn vacant_slot(&mut self) -> VacantSlot<'_, T> {
        let key = if self.next_vacant_idx < self.entries.len() {
            self.next_vacant_idx
        } else {
            self.entries.len()
        };

        VacantSlot { map: self, key }
    }

    /// Insert a new value into the [`SlabMap`], and return its key
    #[inline]
    pub fn insert(&mut self, value: T) -> usize {
        self.insert_with_key(move |_| value)
    }

    /// Insert a new value that depends on its own key into the [`SlabMap`]
    ///
    /// ```
    /// # use slabmap::SlabMap;
    /// let mut map = SlabMap::new();
    /// let key = map.insert_with_key(|key| (key, "self"));
    /// assert_eq!(map[key], (key, "self"));
    /// ```
    #[inline]
    pub fn insert_with_key(&mut self, value: impl FnOnce(usize) -> T) -> usize {
        let slot = self.vacant_slot();
        let key = slot.key();
        slot.insert(value(key));
        key
    }

    // `idx` is either the head of the free list, or one past the last slot
    fn fill(&mut self, idx: usize, value: T) {
        match self.entries.get(idx) {
            None => {
                debug_assert_eq!(idx, self.entries.len());
                self.entries.push(Entry::Occupied(value));
            }
            Some(&Entry::VacantHead { vacant_body_len }) => {
                if vacant_body_len > 0 {
                    self.entries[idx + 1] = Entry::VacantHead {
                        vacant_body_len: vacant_body_len - 1,
                    };
                }
                // with an empty body, `idx + 1` is the run's tail
                self.next_vacant_idx = idx + 1;
                self.occupy(idx, value);
            }
            Some(&Entry::VacantTail { next_vacant_idx }) => {
                self.next_vacant_idx = next_vacant_idx;
                self.occupy(idx, value);
            }
            Some(Entry::Occupied(_)) => free_list_corrupted(idx),
        }

        self.len += 1;
    }

    fn occupy(&mut self, idx: usize, value: T) {
        self.entries[idx] = Entry::Occupied(value);
        self.non_optimized = self.non_optimized.saturating_sub(1);
    }

    /// Remove the value associated with the key, and return it
    ///
    /// Returns None if the key is out of bounds or if the slot is vacant
    ///
    /// Removing the last remaining value resets the map, just like [`SlabMap::clear`]
    pub fn remove(&mut self, key: usize) -> Option<T> {
        if !self.entries.get(key)?.is_occupied() {
            return None;
        }

        let entry = if key + 1 == self.entries.len() {
            self.entries.pop()?
        } else {
            let vacant = Entry::VacantTail {
                next_vacant_idx: self.next_vacant_idx,
            };
            self.next_vacant_idx = key;
            self.non_optimized += 1;
            core::mem::replace(&mut self.entries[key], vacant)
        };

        self.len -= 1;
        if self.len == 0 {
            self.clear();
        }

        entry.into_value()
    }

    /// Remove all values from the [`SlabMap`]
    ///
    /// This keeps the allocated capacity
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_vacant_idx = INVALID_INDEX;
        self.len = 0;
        self.non_optimized = 0;
    }

    /// Remove all values from the [`SlabMap`], and iterate over them in key order
    ///
    /// The map is cleared even if the iterator is dropped before it's exhausted
    pub fn drain(&mut self) -> Drain<'_, T> {
        let len = core::mem::take(&mut self.len);
        self.next_vacant_idx = INVALID_INDEX;
        self.non_optimized = 0;
        Drain::new(self.entries.drain(..), len)
    }

    /// Get an iterator over the keys and references to elements, in key order
    ///
    /// To stop early, just stop pulling from the iterator
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.entries.iter(), self.len)
    }

    /// Get an iterator over the keys and mut references to elements, in key order
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.entries.iter_mut(), self.len)
    }

    /// Get an iterator over the keys, in ascending order
    pub fn keys(&self) -> Keys<'_, T> {
        Keys::new(self.iter())
    }

    /// Get an iterator over the references to elements, in key order
    pub fn values(&self) -> Values<'_, T> {
        Values::new(self.iter())
    }

    /// Get an iterator over the mut references to elements, in key order
    pub fn values_mut(&mut self) -> ValuesMut<'_, T> {
        ValuesMut::new(self.iter_mut())
    }

    #[cfg(any(test, kani))]
    pub(crate) fn assert_invariants(&self) {
        let occupied = self.entries.iter().filter(|entry| entry.is_occupied()).count();
        assert_eq!(occupied, self.len);
        if self.len == 0 {
            assert!(self.entries.is_empty());
        }

        let mut vacant = 0;
        let mut idx = self.next_vacant_idx;
        while idx != INVALID_INDEX {
            assert!(vacant < self.entries.len(), "free list has a cycle");

            match self.entries[idx] {
                Entry::Occupied(_) => panic!("free list reached occupied slot {idx}"),
                Entry::VacantHead { vacant_body_len } => {
                    let tail = idx + vacant_body_len + 1;
                    assert!(matches!(self.entries[tail], Entry::VacantTail { .. }));
                    assert!(self.entries[idx + 1..tail]
                        .iter()
                        .all(|entry| !entry.is_occupied()));
                    vacant += vacant_body_len + 1;
                    idx = tail;
                }
                Entry::VacantTail { next_vacant_idx } => {
                    vacant += 1;
                    idx = next_vacant_idx;
                }
            }
        }

        assert_eq!(vacant, self.entries.len() - self.len);
    }
}

impl<T> Default for SlabMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SlabMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> ops::Index<usize> for SlabMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, key: usize) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => access_vacant_key(key),
        }
    }
}

impl<T> ops::IndexMut<usize> for SlabMap<T> {
    #[inline]
    fn index_mut(&mut self, key: usize) -> &mut Self::Output {
        match self.get_mut(key) {
            Some(value) => value,
            None => access_vacant_key(key),
        }
    }
}

impl<T> IntoIterator for SlabMap<T> {
    type Item = (usize, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.entries.into_iter(), self.len)
    }
}

impl<'a, T> IntoIterator for &'a SlabMap<T> {
    type Item = (usize, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SlabMap<T> {
    type Item = (usize, &'a mut T);
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(kani)]
#[kani::proof]
#[kani::unwind(6)]
fn proof_vacant_run_consume() {
    let mut map = SlabMap::with_capacity(4);
    for i in 0..4u8 {
        map.insert(i);
    }

    let hole = kani::any::<usize>();
    kani::assume(hole < 3);
    map.remove(hole);
    map.remove(hole + 1);
    map.optimize();
    map.assert_invariants();

    assert_eq!(map.insert(10), hole);
    assert_eq!(map.insert(11), hole + 1);
    map.assert_invariants();
}
