//! A raw separate-chaining hash table.
//!
//! [`HashTable`] stores values of type `V` in a prime-sized array of collision
//! chains. Like the raw tables in `hashbrown`, it never hashes anything
//! itself: every operation takes a precomputed `u64` hash and an equality
//! predicate. [`HashMap`](crate::HashMap) layers keys and a `BuildHasher` on
//! top.

use alloc::alloc::handle_alloc_error;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::slice;

use crate::bucket::Bucket;
use crate::bucket::ChainIntoIter;
use crate::bucket::ChainIter;
use crate::bucket::ChainIterMut;
use crate::error::Error;
use crate::prime::next_prime_at_least;

/// Requested table sizes are raised to at least this many buckets before
/// being rounded up to a prime, so the smallest table has 11 buckets.
pub const DEFAULT_TABLE_SIZE: usize = 10;

/// The `len / table_size` threshold new tables start with.
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 1.0;

#[inline(always)]
fn slot(hash: u64, table_size: usize) -> usize {
    (hash % table_size as u64) as usize
}

#[inline]
fn table_size_for(requested: usize) -> Result<usize, Error> {
    next_prime_at_least(requested.max(DEFAULT_TABLE_SIZE)).ok_or(Error::CapacityOverflow)
}

fn validate_load_factor(max_load_factor: f32) -> Result<f32, Error> {
    if max_load_factor.is_finite() && max_load_factor > 0.0 {
        Ok(max_load_factor)
    } else {
        Err(Error::InvalidLoadFactor(max_load_factor))
    }
}

/// Turns a failed growth into an abort or panic, the way `Vec` does for its
/// infallible methods.
///
/// `TryReserveError` does not expose the layout that failed, so an allocation
/// failure is reported with the layout of the new bucket array. The request
/// that actually failed may be the chain-length scratch vector or one chain's
/// storage for the same rehash.
#[cold]
#[inline(never)]
fn capacity_error<V>(error: Error, table_size: usize) -> ! {
    match error {
        Error::Alloc(_) => match Layout::array::<Bucket<V>>(table_size) {
            Ok(layout) => handle_alloc_error(layout),
            Err(_) => panic!("{}", Error::CapacityOverflow),
        },
        other => panic!("{}", other),
    }
}

/// Statistics about chain lengths and memory use.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of entries in the table.
    pub populated: usize,
    /// Number of buckets.
    pub table_size: usize,
    /// Buckets holding at least one entry.
    pub occupied_buckets: usize,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// Current `populated / table_size`.
    pub load_factor: f64,
    /// Threshold that triggers a rehash.
    pub max_load_factor: f32,
    /// Average chain length over occupied buckets.
    pub average_chain: f64,
    /// Bytes held by the bucket array and every chain's storage.
    pub total_bytes: usize,
    /// Bytes in empty buckets and unused chain capacity.
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics to stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {} in {} buckets ({:.2} load factor, max {:.2})",
            self.populated, self.table_size, self.load_factor, self.max_load_factor
        );
        println!(
            "Buckets: {}/{} occupied, longest chain {}, average chain {:.2}",
            self.occupied_buckets, self.table_size, self.longest_chain, self.average_chain
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Number of buckets for every chain length.
///
/// `counts()[n]` is how many buckets hold exactly `n` entries. Available with
/// the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainHistogram {
    /// Bucket counts indexed by chain length.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];
            if units % 8 > 0 {
                bar.push(partial[units % 8 - 1]);
            }
            bar
        };

        println!("chain histogram ({} buckets):", self.counts.iter().sum::<usize>());
        for (len, &count) in self.counts.iter().enumerate() {
            println!("{:>3} | {} ({})", len, make_bar(count), count);
        }
    }
}

/// A hash table using separate chaining over a prime number of buckets.
///
/// `HashTable<V>` does not know how to hash or compare its values: callers
/// pass the hash and an equality predicate to every operation. Two values
/// that compare equal must be given the same hash.
///
/// The table grows when inserting a new value would push
/// `len / table_size` above [`max_load_factor`](Self::max_load_factor). It
/// never shrinks.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hasher;
/// #
/// # use chain_hash::hash_table::Entry;
/// # use chain_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     hasher.write_u64(id);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// assert_eq!(table.table_size(), 11);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Bucket<V>>,
    populated: usize,
    max_load_factor: f32,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("table_size", &self.buckets.len())
            .field("populated", &self.populated)
            .field("max_load_factor", &self.max_load_factor)
            .field(
                "chain_lengths",
                &self.buckets.iter().map(Bucket::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default 11 buckets.
    pub fn new() -> Self {
        Self::with_table_size(DEFAULT_TABLE_SIZE)
    }

    /// Creates an empty table with at least `table_size` buckets.
    ///
    /// The size is raised to [`DEFAULT_TABLE_SIZE`] and then rounded up to the
    /// next prime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_table_size(100);
    /// assert_eq!(table.table_size(), 101);
    ///
    /// let table: HashTable<u64> = HashTable::with_table_size(0);
    /// assert_eq!(table.table_size(), 11);
    /// ```
    pub fn with_table_size(table_size: usize) -> Self {
        match Self::try_with_table_size(table_size) {
            Ok(table) => table,
            Err(error) => capacity_error::<V>(error, table_size),
        }
    }

    /// Fallible version of [`with_table_size`](Self::with_table_size).
    pub fn try_with_table_size(table_size: usize) -> Result<Self, Error> {
        let table_size = table_size_for(table_size)?;
        Ok(Self {
            buckets: Self::try_alloc_buckets(table_size, |_| 0)?,
            populated: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        })
    }

    /// Allocates `table_size` empty buckets, reserving `chain_len(slot)`
    /// entries in each.
    fn try_alloc_buckets(
        table_size: usize,
        chain_len: impl Fn(usize) -> usize,
    ) -> Result<Vec<Bucket<V>>, Error> {
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(table_size)?;
        for slot in 0..table_size {
            let mut bucket = Bucket::new();
            let len = chain_len(slot);
            if len > 0 {
                bucket.try_reserve_exact(len)?;
            }
            buckets.push(bucket);
        }
        Ok(buckets)
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets. Always prime.
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current `len / table_size`.
    pub fn load_factor(&self) -> f32 {
        self.populated as f32 / self.buckets.len() as f32
    }

    /// Returns the load factor threshold that triggers a rehash.
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the load factor threshold.
    ///
    /// The table is not resized here; the new threshold applies from the next
    /// insertion of a new value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLoadFactor`] unless `max_load_factor` is finite and
    /// greater than zero.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), Error> {
        self.max_load_factor = validate_load_factor(max_load_factor)?;
        Ok(())
    }

    /// Returns how many values fit before the next insertion rehashes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// assert_eq!(table.capacity(), 11);
    ///
    /// table.set_max_load_factor(0.5).unwrap();
    /// assert_eq!(table.capacity(), 5);
    /// ```
    pub fn capacity(&self) -> usize {
        (self.buckets.len() as f64 * f64::from(self.max_load_factor)) as usize
    }

    /// Removes every value, keeping the bucket array.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Grows the table so that `additional` more values fit without a rehash.
    ///
    /// # Panics
    ///
    /// Panics if the new table size overflows `usize`. Aborts on allocation
    /// failure.
    pub fn reserve(&mut self, additional: usize) {
        let entries = self.populated.saturating_add(additional);
        match self.growth_target(entries) {
            Ok(None) => {}
            Ok(Some(table_size)) => {
                if let Err(error) = self.try_rehash(table_size) {
                    capacity_error::<V>(error, table_size)
                }
            }
            Err(error) => capacity_error::<V>(error, 0),
        }
    }

    /// Fallible version of [`reserve`](Self::reserve).
    ///
    /// On error the table is left exactly as it was.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let entries = self
            .populated
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        match self.growth_target(entries)? {
            Some(table_size) => self.try_rehash(table_size),
            None => Ok(()),
        }
    }

    /// Computes the table size needed to hold `entries` values, or `None` if
    /// the current size already respects the load factor.
    ///
    /// Growth at least doubles the table, then rounds up to a prime.
    fn growth_target(&self, entries: usize) -> Result<Option<usize>, Error> {
        let table_size = self.buckets.len();
        let max_load_factor = f64::from(self.max_load_factor);
        if entries as f64 <= table_size as f64 * max_load_factor {
            return Ok(None);
        }

        let needed = (entries as f64 / max_load_factor).ceil();
        if needed >= usize::MAX as f64 {
            return Err(Error::CapacityOverflow);
        }
        let doubled = table_size.checked_mul(2).ok_or(Error::CapacityOverflow)?;
        let target = doubled.max(needed as usize);

        next_prime_at_least(target)
            .map(Some)
            .ok_or(Error::CapacityOverflow)
    }

    /// Rebuilds the table with `table_size` buckets.
    ///
    /// All storage for the new array, including every chain, is reserved up
    /// front. Only once that succeeds are values moved, and moving cannot fail,
    /// so an error leaves the old array untouched.
    fn try_rehash(&mut self, table_size: usize) -> Result<(), Error> {
        debug_assert!(crate::prime::is_prime(table_size));

        // Exact per-chain lengths let every chain be reserved before any entry
        // moves, at the cost of one `usize` per new bucket while rehashing.
        let mut chain_lens: Vec<usize> = Vec::new();
        chain_lens.try_reserve_exact(table_size)?;
        chain_lens.resize(table_size, 0);
        for bucket in &self.buckets {
            for hash in bucket.hashes() {
                chain_lens[slot(hash, table_size)] += 1;
            }
        }

        let mut buckets = Self::try_alloc_buckets(table_size, |slot| chain_lens[slot])?;
        for bucket in &mut self.buckets {
            bucket.drain_oldest_first(|hash, value| {
                buckets[slot(hash, table_size)].prepend(hash, value);
            });
        }
        self.buckets = buckets;

        Ok(())
    }

    #[inline]
    fn bucket(&self, hash: u64) -> &Bucket<V> {
        &self.buckets[slot(hash, self.buckets.len())]
    }

    #[inline]
    fn bucket_mut(&mut self, hash: u64) -> &mut Bucket<V> {
        let table_size = self.buckets.len();
        &mut self.buckets[slot(hash, table_size)]
    }

    /// Finds a value by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hasher;
    /// #
    /// # use chain_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     hasher.write_u64(n);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table.insert_unique(hash_u64(7), 7u64);
    ///
    /// assert_eq!(table.find(hash_u64(7), |&v| v == 7), Some(&7));
    /// assert_eq!(table.find(hash_u64(8), |&v| v == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.bucket(hash).find(hash, eq)
    }

    /// Finds a value by hash and equality predicate, mutably.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        self.bucket_mut(hash).find_mut(hash, eq)
    }

    /// Returns 1 if a matching value is present, 0 otherwise.
    pub fn count(&self, hash: u64, eq: impl Fn(&V) -> bool) -> usize {
        self.bucket(hash).count(hash, eq)
    }

    /// Removes and returns a matching value.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let removed = self.bucket_mut(hash).remove(hash, eq);
        if removed.is_some() {
            self.populated -= 1;
        }
        removed
    }

    /// Inserts a value without checking for an equal one.
    ///
    /// The caller must know that no equal value is present; otherwise the
    /// table ends up with two of them. Grows the table first if the new value
    /// would exceed the load factor.
    pub fn insert_unique(&mut self, hash: u64, value: V) -> &mut V {
        self.reserve(1);
        self.place(hash, value)
    }

    /// Places a value in its chain. Growth must already have happened.
    #[inline]
    fn place(&mut self, hash: u64, value: V) -> &mut V {
        self.populated += 1;
        self.bucket_mut(hash).prepend(hash, value)
    }

    /// Gets the entry for a hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hasher;
    /// #
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     hasher.write(s.as_bytes());
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<(String, u32)> = HashTable::new();
    /// for word in ["a", "b", "a"] {
    ///     table
    ///         .entry(hash_str(word), |(w, _)| w == word)
    ///         .or_insert_with(|| (word.to_string(), 0))
    ///         .1 += 1;
    /// }
    ///
    /// assert_eq!(table.find(hash_str("a"), |(w, _)| w == "a").map(|e| e.1), Some(2));
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        let slot = slot(hash, self.buckets.len());
        match self.buckets[slot].position(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry {
                table: self,
                slot,
                index,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Iterates over every value, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.populated,
        }
    }

    /// Iterates over every value mutably.
    ///
    /// Changing a value in a way that changes its hash or equality is a logic
    /// error.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            remaining: self.populated,
            buckets: self.buckets.iter_mut(),
            chain: None,
        }
    }

    /// Removes and yields every value. The bucket array is kept.
    ///
    /// Values not consumed before the iterator is dropped are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            buckets: self.buckets.iter_mut(),
            chain: None,
            populated: &mut self.populated,
        }
    }

    /// Non-empty buckets as `(slot, chain)`, each chain front to back.
    pub(crate) fn chains(&self) -> impl Iterator<Item = (usize, impl Iterator<Item = &V>)> {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(slot, bucket)| (slot, bucket.iter().map(|(_, value)| value)))
    }

    /// Returns detailed chain and memory statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let table_size = self.buckets.len();
        let occupied_buckets = self.buckets.iter().filter(|b| !b.is_empty()).count();
        let longest_chain = self.buckets.iter().map(Bucket::len).max().unwrap_or(0);
        let chain_capacity: usize = self.buckets.iter().map(Bucket::capacity).sum();

        let bucket_bytes = core::mem::size_of::<Bucket<V>>();
        let entry_bytes = core::mem::size_of::<(u64, V)>();

        DebugStats {
            populated: self.populated,
            table_size,
            occupied_buckets,
            longest_chain,
            load_factor: self.populated as f64 / table_size as f64,
            max_load_factor: self.max_load_factor,
            average_chain: if occupied_buckets == 0 {
                0.0
            } else {
                self.populated as f64 / occupied_buckets as f64
            },
            total_bytes: table_size * bucket_bytes + chain_capacity * entry_bytes,
            wasted_bytes: (table_size - occupied_buckets) * bucket_bytes
                + (chain_capacity - self.populated) * entry_bytes,
        }
    }

    /// Returns how many buckets hold each chain length.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let longest = self.buckets.iter().map(Bucket::len).max().unwrap_or(0);
        let mut counts = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            counts[bucket.len()] += 1;
        }
        ChainHistogram { counts }
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from [`HashTable::entry`].
pub enum Entry<'a, V> {
    /// No matching value is present.
    Vacant(VacantEntry<'a, V>),
    /// A matching value is present.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns the
    /// value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Runs `f` on the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts the value, growing the table if needed.
    ///
    /// The value must match the predicate and hash the entry was looked up
    /// with.
    pub fn insert(self, value: V) -> &'a mut V {
        self.table.insert_unique(self.hash, value)
    }
}

/// An occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    slot: usize,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value.
    pub fn get(&self) -> &V {
        self.table.buckets[self.slot].get(self.index)
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.buckets[self.slot].get_mut(self.index)
    }

    /// Converts the entry into a mutable reference bound to the table.
    pub fn into_mut(self) -> &'a mut V {
        self.table.buckets[self.slot].get_mut(self.index)
    }

    /// Removes the value from the table.
    pub fn remove(self) -> V {
        self.table.populated -= 1;
        self.table.buckets[self.slot].remove_at(self.index)
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    buckets: slice::Iter<'a, Bucket<V>>,
    chain: Option<ChainIter<'a, V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, value)) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(value);
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, V> {
    buckets: slice::IterMut<'a, Bucket<V>>,
    chain: Option<ChainIterMut<'a, V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, value)) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(value);
            }
            self.chain = Some(self.buckets.next()?.iter_mut());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    buckets: slice::IterMut<'a, Bucket<V>>,
    chain: Option<ChainIntoIter<V>>,
    // The table's count, lowered as each chain leaves its bucket so it always
    // matches what the buckets still hold, even if the drain is leaked.
    populated: &'a mut usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, value)) = self.chain.as_mut().and_then(Iterator::next) {
                return Some(value);
            }
            let bucket = self.buckets.next()?;
            *self.populated -= bucket.len();
            self.chain = Some(bucket.take());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = *self.populated + self.chain.as_ref().map_or(0, ExactSizeIterator::len);
        (remaining, Some(remaining))
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in self {}
    }
}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    buckets: alloc::vec::IntoIter<Bucket<V>>,
    chain: Option<ChainIntoIter<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, value)) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(value);
            }
            self.chain = Some(self.buckets.next()?.into_chain());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            buckets: self.buckets.into_iter(),
            chain: None,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
