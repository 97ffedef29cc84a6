use crate::entry::{Entry, INVALID_INDEX};

use super::SlabMap;

impl<T> SlabMap<T> {
    /// Keep only the values for which `f` returns true, in key order
    ///
    /// This also rewrites every run of vacant slots into its canonical form and rebuilds the
    /// free list in ascending key order, see [`SlabMap::optimize`]. Trailing vacant slots are
    /// dropped entirely.
    pub fn retain(&mut self, mut f: impl FnMut(usize, &mut T) -> bool) {
        let mut idx = 0;
        let mut vacant_run_start = 0;
        let mut last_tail = INVALID_INDEX;
        self.next_vacant_idx = INVALID_INDEX;

        while let Some(entry) = self.entries.get_mut(idx) {
            match entry {
                Entry::VacantTail { .. } => idx += 1,
                // runs from a previous pass are still canonical, only their ends get rewritten
                Entry::VacantHead { vacant_body_len } => idx += *vacant_body_len + 2,
                Entry::Occupied(value) => {
                    if f(idx, value) {
                        self.merge_vacant(vacant_run_start, idx, &mut last_tail);
                        idx += 1;
                        vacant_run_start = idx;
                    } else {
                        *entry = Entry::VacantTail {
                            next_vacant_idx: INVALID_INDEX,
                        };
                        self.len -= 1;
                        idx += 1;
                    }
                }
            }
        }

        self.entries.truncate(vacant_run_start);
        self.non_optimized = 0;
    }

    /// Rewrite the vacant slots into canonical runs, without touching any values
    ///
    /// After this, the free list hands out vacant slots in ascending key order, and
    /// both insertion and iteration skip each run of vacant slots in O(1).
    ///
    /// Does nothing if no slots were vacated since the last time the map was optimized.
    pub fn optimize(&mut self) {
        if self.non_optimized != 0 {
            self.retain(|_, _| true);
        }
    }

    // turns `start..end` into one run and appends it to the free list
    fn merge_vacant(&mut self, start: usize, end: usize, last_tail: &mut usize) {
        if start == end {
            return;
        }

        if end - start > 1 {
            self.entries[start] = Entry::VacantHead {
                vacant_body_len: end - start - 2,
            };
        }
        self.entries[end - 1] = Entry::VacantTail {
            next_vacant_idx: INVALID_INDEX,
        };

        match self.entries.get_mut(*last_tail) {
            Some(Entry::VacantTail { next_vacant_idx }) => *next_vacant_idx = start,
            _ => {
                debug_assert_eq!(*last_tail, INVALID_INDEX);
                self.next_vacant_idx = start;
            }
        }
        *last_tail = end - 1;
    }
}
