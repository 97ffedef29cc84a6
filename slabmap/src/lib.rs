#![no_std]
#![forbid(
    unsafe_code,
    missing_docs,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]

//! # slabmap
//!
//! [`SlabMap`] is a map from `usize` keys to values, where the map picks the key for you when
//! you insert a value. Lookups, insertions and removals are all O(1).
//!
//! ```
//! use slabmap::SlabMap;
//!
//! let mut map = SlabMap::new();
//! let a = map.insert('a');
//! let b = map.insert('b');
//! let c = map.insert('c');
//!
//! assert_eq!(map.remove(b), Some('b'));
//! assert!(!map.contains_key(b));
//!
//! // the slot that held 'b' is reused
//! let d = map.insert('d');
//! assert_eq!(d, b);
//!
//! let values: Vec<char> = map.values().copied().collect();
//! assert_eq!(values, ['a', 'd', 'c']);
//! assert_eq!(map[a], 'a');
//! assert_eq!(map[c], 'c');
//! ```
//!
//! ## Key stability
//!
//! A key returned by [`SlabMap::insert`] refers to its value until that value is removed
//! (or the map is cleared). Inserting or removing other values never moves it.
//! After removal, the key may be handed out again by a later insertion.
//!
//! Unlike generational arenas, keys are plain indices, so an old key that was reused
//! will silently refer to the new value. If that is a problem for your domain, keep a
//! generation inside your values.
//!
//! ## Vacant runs
//!
//! Removed slots are kept in a free list which is threaded through the vacant slots
//! themselves. Right after a removal, each vacant slot is one link of that list.
//!
//! [`SlabMap::optimize`] and [`SlabMap::retain`] rewrite the map so that every contiguous run
//! of vacant slots is described by just two slots: a head holding the length of the run,
//! and a tail holding the link to the next run. This has a few effects
//!
//! * the free list has one link per run, not one per slot, and it is sorted by key,
//!   so new values fill the lowest keys first
//! * iteration jumps over a whole run at once, no matter how long it is
//! * vacant slots at the end of the map are released
//!
//! Optimizing is O(number of slots), and doesn't do anything if no slots were vacated
//! since the last time the map was optimized.
//!
//! ## Thread safety
//!
//! [`SlabMap`] does no internal synchronization. It is [`Send`] and [`Sync`] whenever `T` is,
//! and mutation requires `&mut`, so sharing it across threads needs a lock like any other
//! collection.

extern crate alloc;

mod entry;
pub mod iter;
mod slab_map;

pub use slab_map::{SlabMap, VacantSlot};
