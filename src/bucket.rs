use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::iter::Rev;
use core::slice;

/// A single collision chain: every entry whose hash lands on one slot.
///
/// Entries are stored with their full `u64` hash so a rehash can recompute the
/// slot without calling back into user hash code.
///
/// The front of the chain is the *end* of `entries`. Prepending is a push, and
/// chain-order iteration walks the vector backwards.
#[derive(Clone)]
pub(crate) struct Bucket<V> {
    entries: Vec<(u64, V)>,
}

pub(crate) type ChainIter<'a, V> = Rev<slice::Iter<'a, (u64, V)>>;
pub(crate) type ChainIterMut<'a, V> = Rev<slice::IterMut<'a, (u64, V)>>;
pub(crate) type ChainIntoIter<V> = Rev<alloc::vec::IntoIter<(u64, V)>>;

impl<V> Bucket<V> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Adds an entry at the front of the chain.
    ///
    /// No uniqueness check is made; the table has already searched the chain.
    #[inline]
    pub(crate) fn prepend(&mut self, hash: u64, value: V) -> &mut V {
        self.entries.push((hash, value));
        let last = self.entries.len() - 1;
        &mut self.entries[last].1
    }

    /// Storage index of the first entry, in chain order, matching `eq`.
    #[inline]
    pub(crate) fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|(h, v)| *h == hash && eq(v))
    }

    #[inline]
    pub(crate) fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.position(hash, eq).map(|index| &self.entries[index].1)
    }

    #[inline]
    pub(crate) fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        self.position(hash, eq)
            .map(move |index| &mut self.entries[index].1)
    }

    /// Presence of a matching entry, as 0 or 1.
    #[inline]
    pub(crate) fn count(&self, hash: u64, eq: impl Fn(&V) -> bool) -> usize {
        usize::from(self.position(hash, eq).is_some())
    }

    /// Unlinks and returns the first matching entry.
    pub(crate) fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        self.position(hash, eq).map(|index| self.remove_at(index))
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> &V {
        &self.entries[index].1
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut V {
        &mut self.entries[index].1
    }

    /// Removes the entry at a storage index, keeping the order of the rest.
    #[inline]
    pub(crate) fn remove_at(&mut self, index: usize) -> V {
        self.entries.remove(index).1
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve_exact(additional)
    }

    /// Full hashes of every entry, in no particular order.
    pub(crate) fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|(hash, _)| *hash)
    }

    /// Moves every entry into `sink`, oldest first.
    ///
    /// Prepending the yielded entries into fresh chains keeps their relative
    /// order intact.
    pub(crate) fn drain_oldest_first(&mut self, mut sink: impl FnMut(u64, V)) {
        for (hash, value) in self.entries.drain(..) {
            sink(hash, value);
        }
    }

    /// Iterates the chain front to back.
    #[inline]
    pub(crate) fn iter(&self) -> ChainIter<'_, V> {
        self.entries.iter().rev()
    }

    #[inline]
    pub(crate) fn iter_mut(&mut self) -> ChainIterMut<'_, V> {
        self.entries.iter_mut().rev()
    }

    /// Takes the whole chain, leaving this bucket empty.
    #[inline]
    pub(crate) fn take(&mut self) -> ChainIntoIter<V> {
        core::mem::take(&mut self.entries).into_iter().rev()
    }

    #[inline]
    pub(crate) fn into_chain(self) -> ChainIntoIter<V> {
        self.entries.into_iter().rev()
    }
}
