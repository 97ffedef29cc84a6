//! The slots that back a [`SlabMap`](crate::SlabMap)
//!
//! Every slot is either [`Entry::Occupied`] or vacant. Vacant slots come in two shapes:
//!
//! * a lone [`Entry::VacantTail`], which is one link of the free list
//! * a canonical run, which is a [`Entry::VacantHead`], `vacant_body_len` body slots, and a
//!   terminating [`Entry::VacantTail`]. Only the head and the tail are ever read, so the body
//!   can hold any vacant entry (usually stale tails or heads from before the run was merged)
//!
//! ```text
//!   head(2)  body  body  tail(next)
//!   [i]      [i+1] [i+2] [i+3]
//! ```

/// Marks the end of the free list
pub(crate) const INVALID_INDEX: usize = usize::MAX;

#[derive(Clone)]
pub(crate) enum Entry<T> {
    Occupied(T),
    VacantHead { vacant_body_len: usize },
    VacantTail { next_vacant_idx: usize },
}

impl<T> Entry<T> {
    #[inline]
    pub(crate) const fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    #[inline]
    pub(crate) const fn value(&self) -> Option<&T> {
        match self {
            Self::Occupied(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Occupied(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_value(self) -> Option<T> {
        match self {
            Self::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// The number of body slots between this head and its tail, or None if this isn't a head
    #[inline]
    pub(crate) const fn run_body_len(&self) -> Option<usize> {
        match *self {
            Self::VacantHead { vacant_body_len } => Some(vacant_body_len),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let mut occupied = Entry::Occupied('a');
        assert!(occupied.is_occupied());
        assert_eq!(occupied.value(), Some(&'a'));
        *occupied.value_mut().unwrap() = 'b';
        assert_eq!(occupied.run_body_len(), None);
        assert_eq!(occupied.into_value(), Some('b'));

        let head = Entry::<char>::VacantHead { vacant_body_len: 3 };
        assert!(!head.is_occupied());
        assert_eq!(head.value(), None);
        assert_eq!(head.run_body_len(), Some(3));

        let tail = Entry::<char>::VacantTail {
            next_vacant_idx: INVALID_INDEX,
        };
        assert!(!tail.is_occupied());
        assert_eq!(tail.run_body_len(), None);
        assert_eq!(tail.into_value(), None);
    }
}
