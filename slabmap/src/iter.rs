//! Iterators over a [`SlabMap`](crate::SlabMap)
//!
//! All iterators yield entries in ascending key order. Going forward, a canonical run of vacant
//! slots is skipped in one step. They also track how many values are left, so they stop as
//! soon as the last value was yielded instead of walking over trailing vacant slots.

use core::iter::{Enumerate, FusedIterator};

use alloc::vec;

use crate::entry::Entry;

/// An iterator over the keys and references to elements of a [`SlabMap`](crate::SlabMap)
///
/// created via [`SlabMap::iter`](crate::SlabMap::iter)
pub struct Iter<'a, T> {
    entries: Enumerate<core::slice::Iter<'a, Entry<T>>>,
    len: usize,
}

/// An iterator over the keys and mut references to elements of a [`SlabMap`](crate::SlabMap)
///
/// created via [`SlabMap::iter_mut`](crate::SlabMap::iter_mut)
pub struct IterMut<'a, T> {
    entries: Enumerate<core::slice::IterMut<'a, Entry<T>>>,
    len: usize,
}

/// An owning iterator over the keys and elements of a [`SlabMap`](crate::SlabMap)
pub struct IntoIter<T> {
    entries: Enumerate<vec::IntoIter<Entry<T>>>,
    len: usize,
}

/// A draining iterator over the keys and elements of a [`SlabMap`](crate::SlabMap)
///
/// created via [`SlabMap::drain`](crate::SlabMap::drain)
pub struct Drain<'a, T> {
    entries: Enumerate<vec::Drain<'a, Entry<T>>>,
    len: usize,
}

macro_rules! entry_iter {
    ($name:ident<$($lt:lifetime,)? T>, $inner:ty, $item:ty) => {
        impl<$($lt,)? T> $name<$($lt,)? T> {
            pub(crate) fn new(entries: $inner, len: usize) -> Self {
                Self {
                    entries: entries.enumerate(),
                    len,
                }
            }
        }

        impl<$($lt,)? T> Iterator for $name<$($lt,)? T> {
            type Item = (usize, $item);

            fn next(&mut self) -> Option<Self::Item> {
                while self.len != 0 {
                    let (key, entry) = self.entries.next()?;

                    if let Some(vacant_body_len) = entry.run_body_len() {
                        // skip the body and the tail
                        self.entries.nth(vacant_body_len);
                    } else if let Entry::Occupied(value) = entry {
                        self.len -= 1;
                        return Some((key, value));
                    }
                }

                None
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.len, Some(self.len))
            }
        }

        impl<$($lt,)? T> DoubleEndedIterator for $name<$($lt,)? T> {
            fn next_back(&mut self) -> Option<Self::Item> {
                while self.len != 0 {
                    if let (key, Entry::Occupied(value)) = self.entries.next_back()? {
                        self.len -= 1;
                        return Some((key, value));
                    }
                }

                None
            }
        }

        impl<$($lt,)? T> ExactSizeIterator for $name<$($lt,)? T> {}
        impl<$($lt,)? T> FusedIterator for $name<$($lt,)? T> {}
    };
}

entry_iter!(Iter<'a, T>, core::slice::Iter<'a, Entry<T>>, &'a T);
entry_iter!(IterMut<'a, T>, core::slice::IterMut<'a, Entry<T>>, &'a mut T);
entry_iter!(IntoIter<T>, vec::IntoIter<Entry<T>>, T);
entry_iter!(Drain<'a, T>, vec::Drain<'a, Entry<T>>, T);

/// An iterator over the keys of a [`SlabMap`](crate::SlabMap)
pub struct Keys<'a, T> {
    iter: Iter<'a, T>,
}

/// An iterator over the references to elements of a [`SlabMap`](crate::SlabMap)
pub struct Values<'a, T> {
    iter: Iter<'a, T>,
}

/// An iterator over the mut references to elements of a [`SlabMap`](crate::SlabMap)
pub struct ValuesMut<'a, T> {
    iter: IterMut<'a, T>,
}

macro_rules! project_iter {
    ($name:ident, $inner:ident, $item:ty, |$key:pat_param, $value:pat_param| $out:expr) => {
        impl<'a, T> $name<'a, T> {
            pub(crate) fn new(iter: $inner<'a, T>) -> Self {
                Self { iter }
            }
        }

        impl<'a, T> Iterator for $name<'a, T> {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                self.iter.next().map(|($key, $value)| $out)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.iter.size_hint()
            }
        }

        impl<T> DoubleEndedIterator for $name<'_, T> {
            fn next_back(&mut self) -> Option<Self::Item> {
                self.iter.next_back().map(|($key, $value)| $out)
            }
        }

        impl<T> ExactSizeIterator for $name<'_, T> {}
        impl<T> FusedIterator for $name<'_, T> {}
    };
}

project_iter!(Keys, Iter, usize, |key, _| key);
project_iter!(Values, Iter, &'a T, |_, value| value);
project_iter!(ValuesMut, IterMut, &'a mut T, |_, value| value);
