use core::fmt::Debug;
use core::fmt::Display;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Index;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A key and its value, as stored in a [`HashMap`] chain.
///
/// Displaying an entry shows only its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashEntry<K, V> {
    /// The key the entry is found by.
    pub key: K,
    /// The stored value.
    pub value: V,
}

impl<K, V> HashEntry<K, V> {
    /// Creates an entry from a key and a value.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V: Display> Display for HashEntry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.value, f)
    }
}

/// A hash map built on the chained [`HashTable`].
///
/// `HashMap<K, V, S>` stores unique keys implementing `Hash + Eq` and hashes
/// them with the hasher builder `S`. Keys land in one of a prime number of
/// buckets; the bucket array grows to the next prime at or above twice its
/// size whenever a new key would push `len / table_size` above the
/// [`max_load_factor`](Self::max_load_factor).
///
/// Two accessors differ on a missing key:
/// [`at`](Self::at) inserts a default value for a missing key, while
/// [`try_index`](Self::try_index) and the `Index` operator report
/// [`Error::KeyNotFound`].
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use chain_hash::HashMap;
///
/// let mut stock: HashMap<&str, u32> = HashMap::new();
/// assert!(stock.insert("apples", 3));
/// assert!(!stock.insert("apples", 5));
///
/// *stock.at("pears") += 2;
///
/// assert_eq!(stock.get(&"apples"), Some(&5));
/// assert_eq!(stock.get(&"pears"), Some(&2));
/// assert!(stock.try_index(&"plums").is_err());
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<HashEntry<K, V>>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One line per non-empty bucket: the slot followed by its chain of values.
///
/// The layout is a debugging aid and may change.
impl<K, V, S> Display for HashMap<K, V, S>
where
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (slot, chain) in self.table.chains() {
            write!(f, "[{}]", slot)?;
            for (position, entry) in chain.enumerate() {
                let separator = if position == 0 { " " } else { " -> " };
                write!(f, "{}{}", separator, entry)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with the default 11 buckets and the given hasher
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.table_size(), 11);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with at least `table_size` buckets, rounded up to
    /// a prime, and the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_table_size_and_hasher(100, SimpleHasher);
    /// assert_eq!(map.table_size(), 101);
    /// ```
    pub fn with_table_size_and_hasher(table_size: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_table_size(table_size),
            hash_builder,
        }
    }

    /// Fallible version of
    /// [`with_table_size_and_hasher`](Self::with_table_size_and_hasher).
    pub fn try_with_table_size_and_hasher(
        table_size: usize,
        hash_builder: S,
    ) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::try_with_table_size(table_size)?,
            hash_builder,
        })
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always prime.
    pub fn table_size(&self) -> usize {
        self.table.table_size()
    }

    /// Returns the current `len / table_size`.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the load factor threshold that triggers a rehash.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Sets the load factor threshold. It takes effect on the next insertion
    /// of a new key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLoadFactor`] unless the value is finite and greater than
    /// zero.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), Error> {
        self.table.set_max_load_factor(max_load_factor)
    }

    /// Returns how many entries fit before the next new key rehashes.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every entry. The number of buckets is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    /// let table_size = map.table_size();
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.table_size(), table_size);
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the map so that `additional` more keys fit without a rehash.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Fallible version of [`reserve`](Self::reserve). On error the map is
    /// unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Inserts a key-value pair.
    ///
    /// Returns `true` if the key was new. If the key was already present its
    /// value is overwritten in place and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// assert_eq!(map.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |e| e.key == key) {
            TableEntry::Occupied(mut entry) => {
                entry.get_mut().value = value;
                false
            }
            TableEntry::Vacant(entry) => {
                entry.insert(HashEntry::new(key, value));
                true
            }
        }
    }

    /// Like [`insert`](Self::insert), but reports a failed rehash instead of
    /// aborting.
    ///
    /// On error nothing is inserted and the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, Error> {
        let hash = self.hash_builder.hash_one(&key);
        if let Some(entry) = self.table.find_mut(hash, |e| e.key == key) {
            entry.value = value;
            return Ok(false);
        }

        self.table.try_reserve(1)?;
        self.table.insert_unique(hash, HashEntry::new(key, value));
        Ok(true)
    }

    /// Copies the value for `key` into `out`.
    ///
    /// Returns `false` and leaves `out` alone if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::from([(1, "one".to_string())]);
    /// let mut out = String::from("unset");
    ///
    /// assert!(!map.retrieve(&2, &mut out));
    /// assert_eq!(out, "unset");
    ///
    /// assert!(map.retrieve(&1, &mut out));
    /// assert_eq!(out, "one");
    /// # }
    /// ```
    pub fn retrieve(&self, key: &K, out: &mut V) -> bool
    where
        V: Clone,
    {
        match self.get(key) {
            Some(value) => {
                out.clone_from(value);
                true
            }
            None => false,
        }
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |e| e.key == *key)
            .map(|e| (&e.key, &e.value))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |e| e.key == *key)
            .map(|e| &mut e.value)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.count(key) == 1
    }

    /// Returns 1 if `key` is present and 0 otherwise.
    pub fn count(&self, key: &K) -> usize {
        let hash = self.hash_builder.hash_one(key);
        self.table.count(hash, |e| e.key == *key)
    }

    /// Removes `key`, returning whether it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// assert!(!map.erase(&1));
    ///
    /// map.insert(1, 10);
    /// assert!(map.erase(&1));
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn erase(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if it was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .remove(hash, |e| e.key == *key)
            .map(|e| (e.key, e.value))
    }

    /// Returns the value for `key`, inserting `V::default()` first if the key
    /// is missing.
    ///
    /// Inserting may rehash the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let mut counts: HashMap<char, usize> = HashMap::new();
    /// for c in "hello".chars() {
    ///     *counts.at(c) += 1;
    /// }
    ///
    /// assert_eq!(counts.get(&'l'), Some(&2));
    /// assert_eq!(counts.len(), 4);
    /// # }
    /// ```
    pub fn at(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is missing.
    pub fn try_index(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the value for `key` mutably.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is missing. The map is never modified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::Error;
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::from([("a", 1)]);
    /// *map.try_index_mut(&"a")? += 1;
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map.try_index_mut(&"b"), Err(Error::KeyNotFound));
    /// # }
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn try_index_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    ///
    /// map.entry(1).or_insert("a");
    /// map.entry(2).or_insert("b");
    /// map.entry(1).or_insert("c");
    ///
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), Some(&"b"));
    /// # }
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |e| e.key == key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Replaces the contents of the map with `iter`.
    ///
    /// The map is cleared first, so its bucket array is reused. For repeated
    /// keys the last value wins.
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.clear();
        self.extend(iter);
    }

    /// Returns an iterator over the key-value pairs, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields every key-value pair. The bucket array is kept.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns chain-length and memory statistics for the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns how many buckets hold each chain length.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> crate::hash_table::ChainHistogram {
        self.table.chain_histogram()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map with the default 11 buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.table_size(), 11);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with at least `table_size` buckets, rounded up to
    /// a prime.
    pub fn with_table_size(table_size: usize) -> Self {
        Self::with_table_size_and_hasher(table_size, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

/// Looks up `key`, panicking if it is missing.
///
/// Use [`HashMap::try_index`] to handle a missing key.
impl<K, V, S> Index<&K> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.try_index(key) {
            Ok(value) => value,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S, const N: usize> From<[(K, V); N]> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns the
    /// value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Runs `f` on the value if the entry is occupied.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A vacant entry in a [`HashMap`].
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, HashEntry<K, V>>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// The key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes back ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value, possibly rehashing, and returns a reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert(HashEntry::new(self.key, value)).value
    }
}

/// An occupied entry in a [`HashMap`].
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, HashEntry<K, V>>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// The stored key.
    pub fn key(&self) -> &K {
        &self.entry.get().key
    }

    /// The stored value.
    pub fn get(&self) -> &V {
        &self.entry.get().value
    }

    /// The stored value, mutably.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().value
    }

    /// Converts the entry into a reference bound to the map.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().value
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry and returns its value.
    pub fn remove(self) -> V {
        self.entry.remove().value
    }

    /// Removes the entry and returns its key and value.
    pub fn remove_entry(self) -> (K, V) {
        let HashEntry { key, value } = self.entry.remove();
        (key, value)
    }
}

/// An iterator over the key-value pairs of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, HashEntry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the key-value pairs of a [`HashMap`] with mutable values.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, HashEntry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over mutable references to the values of a [`HashMap`].
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a [`HashMap`].
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, HashEntry<K, V>>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (e.key, e.value))
    }
}

/// An owning iterator over the key-value pairs of a [`HashMap`].
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<HashEntry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::prime::is_prime;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type Map<K, V> = HashMap<K, V, SipHashBuilder>;

    #[test]
    fn test_new_and_with_hasher() {
        let map: Map<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.table_size(), 11);
        assert_eq!(map.max_load_factor(), 1.0);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.table_size(), 11);
    }

    #[test]
    fn test_with_table_size() {
        let map: Map<i32, String> = HashMap::with_table_size(100);
        assert_eq!(map.table_size(), 101);
        assert!(map.is_empty());

        let map2 = HashMap::<i32, String, _>::with_table_size_and_hasher(
            3,
            SipHashBuilder::default(),
        );
        assert_eq!(map2.table_size(), 11);

        let map3 =
            HashMap::<i32, String, _>::try_with_table_size_and_hasher(24, SipHashBuilder::default())
                .unwrap();
        assert_eq!(map3.table_size(), 29);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map: Map<i32, String> = HashMap::new();

        assert!(map.insert(1, "hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert!(!map.insert(1, "world".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
        assert_eq!(map.get_key_value(&1), Some((&1, &"world".to_string())));
    }

    #[test]
    fn test_try_insert() {
        let mut map: Map<i32, i32> = HashMap::new();
        assert_eq!(map.try_insert(1, 10), Ok(true));
        assert_eq!(map.try_insert(1, 20), Ok(false));
        assert_eq!(map.get(&1), Some(&20));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_try_insert_failure_leaves_map_unchanged() {
        let mut map: Map<i32, i32> = (0..11).map(|i| (i, i)).collect();
        map.set_max_load_factor(f32::MIN_POSITIVE).unwrap();

        // Overwrites never grow the table.
        assert_eq!(map.try_insert(3, 30), Ok(false));
        assert_eq!(map.try_insert(11, 11), Err(Error::CapacityOverflow));

        assert_eq!(map.len(), 11);
        assert_eq!(map.table_size(), 11);
        assert!(!map.contains_key(&11));
        assert_eq!(map.get(&3), Some(&30));
        for i in (0..11).filter(|&i| i != 3) {
            assert_eq!(map.get(&i), Some(&i));
        }
    }

    #[test]
    fn test_retrieve() {
        let mut map: Map<&str, Vec<i32>> = HashMap::new();
        map.insert("a", vec![1, 2]);

        let mut out = vec![9];
        assert!(!map.retrieve(&"b", &mut out));
        assert_eq!(out, [9]);

        assert!(map.retrieve(&"a", &mut out));
        assert_eq!(out, [1, 2]);

        out.push(3);
        assert_eq!(map.get(&"a"), Some(&vec![1, 2]));
    }

    #[test]
    fn test_get_mut() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_count_and_contains_key() {
        let mut map: Map<i32, i32> = HashMap::new();
        assert_eq!(map.count(&1), 0);
        assert!(!map.contains_key(&1));

        map.insert(1, 1);
        map.insert(1, 2);
        assert_eq!(map.count(&1), 1);
        assert!(map.contains_key(&1));
        assert_eq!(map.count(&2), 0);
    }

    #[test]
    fn test_erase_and_remove() {
        let mut map: Map<i32, String> = HashMap::new();
        assert!(!map.erase(&1));
        assert_eq!(map.len(), 0);

        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());
        map.insert(3, "!".to_string());

        assert!(map.erase(&1));
        assert!(!map.erase(&1));
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&2), Some("world".to_string()));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.remove_entry(&3), Some((3, "!".to_string())));
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut map: Map<i32, i32> = (0..50).map(|i| (i, i)).collect();
        let table_size = map.table_size();
        assert!(table_size > 11);

        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.table_size(), table_size);
        for i in 0..50 {
            assert!(!map.contains_key(&i));
        }

        assert!(map.insert(7, 7));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_at_inserts_default() {
        let mut map: Map<&str, i32> = HashMap::new();
        assert_eq!(*map.at("missing"), 0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.count(&"missing"), 1);

        *map.at("missing") += 5;
        *map.at("other") = 1;
        assert_eq!(map.get(&"missing"), Some(&5));
        assert_eq!(map.get(&"other"), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_try_index() {
        let mut map: Map<i32, i32> = HashMap::new();
        assert_eq!(map.try_index(&1), Err(Error::KeyNotFound));
        assert_eq!(map.try_index_mut(&1), Err(Error::KeyNotFound));
        assert!(map.is_empty());

        map.insert(1, 10);
        assert_eq!(map.try_index(&1), Ok(&10));
        *map.try_index_mut(&1).unwrap() = 11;
        assert_eq!(map[&1], 11);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_key_panics() {
        let map: Map<i32, i32> = HashMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_set_max_load_factor() {
        let mut map: Map<i32, i32> = HashMap::new();
        assert_eq!(map.set_max_load_factor(0.0), Err(Error::InvalidLoadFactor(0.0)));
        assert_eq!(map.max_load_factor(), 1.0);

        map.set_max_load_factor(0.5).unwrap();
        assert_eq!(map.max_load_factor(), 0.5);
        assert_eq!(map.capacity(), 5);

        for i in 0..6 {
            map.insert(i, i);
        }
        assert!(map.load_factor() <= 0.5);
        assert_eq!(map.table_size(), 23);
    }

    #[test]
    fn test_rehash_scenario_one_to_twelve() {
        let mut map: Map<u32, u32> = HashMap::new();
        map.set_max_load_factor(1.0).unwrap();
        assert_eq!(map.table_size(), 11);

        let mut rehashes = 0;
        for k in 1..=12u32 {
            let before = map.table_size();
            map.insert(k, k * 100);
            if map.table_size() != before {
                assert!(map.table_size() > before);
                rehashes += 1;
            }
            assert!(is_prime(map.table_size()));
        }

        assert!(rehashes >= 1);
        assert_eq!(map.len(), 12);
        for k in 1..=12u32 {
            assert_eq!(map.get(&k), Some(&(k * 100)));
        }
    }

    #[test]
    fn test_clone_isolation() {
        let mut original: Map<i32, String> = HashMap::new();
        for i in 0..5 {
            original.insert(i, format!("v{}", i));
        }

        let mut copy = original.clone();
        *copy.try_index_mut(&2).unwrap() = "changed".to_string();
        copy.erase(&4);
        copy.insert(9, "new".to_string());

        for i in 0..5 {
            assert_eq!(original.get(&i), Some(&format!("v{}", i)));
        }
        assert!(!original.contains_key(&9));
        assert_eq!(original.len(), 5);
        assert_eq!(copy.get(&2), Some(&"changed".to_string()));
        assert_eq!(copy.len(), 5);
    }

    #[test]
    fn test_clone_from() {
        let source: Map<i32, i32> = (0..30).map(|i| (i, -i)).collect();
        let mut target: Map<i32, i32> = HashMap::from([(100, 100)]);
        target.clone_from(&source);

        assert_eq!(target, source);
        assert!(!target.contains_key(&100));
        assert_eq!(target.table_size(), source.table_size());
    }

    #[test]
    fn test_from_array_last_duplicate_wins() {
        let map: Map<&str, i32> = HashMap::from([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a"), Some(&3));
        assert_eq!(map.get(&"b"), Some(&2));
    }

    #[test]
    fn test_assign() {
        let mut map: Map<i32, i32> = (0..40).map(|i| (i, i)).collect();
        let table_size = map.table_size();

        map.assign([(1, 10), (2, 20), (1, 11)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&11));
        assert_eq!(map.get(&2), Some(&20));
        assert!(!map.contains_key(&3));
        assert_eq!(map.table_size(), table_size);
    }

    #[test]
    fn test_reserve() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.reserve(1000);
        let table_size = map.table_size();
        assert!(map.capacity() >= 1000);

        for i in 0..1000 {
            map.insert(i, i);
        }
        assert_eq!(map.table_size(), table_size);
        assert_eq!(map.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
    }

    #[test]
    fn test_entry_api() {
        let mut map: Map<i32, String> = HashMap::new();

        let value = map.entry(1).or_insert("hello".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        let value = map.entry(1).or_insert("world".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(map.get(&2), Some(&"computed".to_string()));

        map.entry(1)
            .and_modify(|v| v.push_str(" world"))
            .or_insert("default".to_string());
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));

        assert_eq!(map.entry(3).key(), &3);
        assert!(!map.contains_key(&3));
    }

    #[test]
    fn test_occupied_entry() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"hello".to_string());

                *entry.get_mut() = "world".to_string();
                assert_eq!(entry.insert("new".to_string()), "world".to_string());

                let (key, value) = entry.remove_entry();
                assert_eq!(key, 1);
                assert_eq!(value, "new".to_string());
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }

        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map: Map<i32, String> = HashMap::new();

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);
                let value = entry.insert("hello".to_string());
                assert_eq!(value, &"hello".to_string());
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        match map.entry(2) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), 2),
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_iterators() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        let pairs: std::collections::HashMap<i32, String> =
            map.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.get(&2), Some(&"two".to_string()));

        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, [1, 2, 3]);

        for value in map.values_mut() {
            value.make_ascii_uppercase();
        }
        for (_, value) in map.iter_mut() {
            value.push('!');
        }
        let values: std::collections::HashSet<String> = map.values().cloned().collect();
        assert!(values.contains("ONE!"));
        assert!(values.contains("THREE!"));

        assert_eq!((&map).into_iter().count(), 3);
        let mut owned: Vec<(i32, String)> = map.into_iter().collect();
        owned.sort();
        assert_eq!(owned[0], (1, "ONE!".to_string()));
    }

    #[test]
    fn test_drain() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        let drained: std::collections::HashMap<i32, String> = map.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(map.is_empty());
        assert_eq!(drained.get(&3), Some(&"three".to_string()));
    }

    #[test]
    fn test_equality() {
        let a: Map<i32, i32> = (0..20).map(|i| (i, i)).collect();
        let mut b: Map<i32, i32> = (0..20).rev().map(|i| (i, i)).collect();
        assert_eq!(a, b);

        b.insert(5, 50);
        assert_ne!(a, b);
        b.insert(5, 5);
        b.insert(20, 20);
        assert_ne!(a, b);
    }

    #[test]
    fn test_entry_display_shows_value() {
        let entry = HashEntry::new("key", 42);
        assert_eq!(entry.to_string(), "42");
        assert_eq!(entry.to_string(), 42.to_string());
    }

    #[test]
    fn test_map_display_lists_chains() {
        let map: Map<i32, &str> = HashMap::from([(1, "x"), (2, "y"), (3, "z")]);
        let rendered = map.to_string();

        assert_eq!(rendered.lines().count(), map.table.chains().count());
        for value in ["x", "y", "z"] {
            assert_eq!(rendered.matches(value).count(), 1, "{}", rendered);
        }
        assert!(rendered.lines().all(|line| line.starts_with('[')));

        let empty: Map<i32, i32> = HashMap::new();
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_debug_output() {
        let map: Map<i32, i32> = HashMap::from([(1, 2)]);
        assert_eq!(format!("{:?}", map), "{1: 2}");
    }

    #[test]
    fn test_string_keys() {
        let mut map: Map<String, i32> = HashMap::new();

        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);
        map.insert("rust".to_string(), 3);

        assert_eq!(map.get(&"hello".to_string()), Some(&1));
        assert_eq!(map.get(&"rust".to_string()), Some(&3));
        assert_eq!(map.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_stats_track_chains() {
        let map: Map<i32, i32> = (0..200).map(|i| (i, i)).collect();
        let stats = map.debug_stats();
        assert_eq!(stats.populated, 200);
        assert_eq!(stats.table_size, map.table_size());
        assert!(stats.load_factor <= 1.0);

        let histogram = map.chain_histogram();
        let total: usize = histogram
            .counts()
            .iter()
            .enumerate()
            .map(|(len, count)| len * count)
            .sum();
        assert_eq!(total, 200);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_random_operations_match_model() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut map: Map<u16, u32> = HashMap::new();
        let mut model = std::collections::HashMap::new();

        for step in 0..20_000u32 {
            let key = rng.random_range(0..512u16);
            match rng.random_range(0..5u8) {
                0 | 1 => {
                    let before = map.table_size();
                    let is_new = map.insert(key, step);
                    assert_eq!(is_new, model.insert(key, step).is_none());
                    if map.table_size() != before {
                        assert!(map.table_size() >= before * 2);
                    }
                }
                2 => assert_eq!(map.erase(&key), model.remove(&key).is_some()),
                3 => {
                    *map.at(key) += 1;
                    *model.entry(key).or_default() += 1;
                }
                _ => {
                    let mut out = u32::MAX;
                    let found = map.retrieve(&key, &mut out);
                    assert_eq!(found, model.contains_key(&key));
                    assert_eq!(out, model.get(&key).copied().unwrap_or(u32::MAX));
                }
            }

            assert_eq!(map.len(), model.len());
            assert!(is_prime(map.table_size()));
            assert!(map.load_factor() <= map.max_load_factor());
        }

        for (k, v) in &model {
            assert_eq!(map.get(k), Some(v));
        }
    }
}
