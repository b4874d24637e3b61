use alloc::collections::TryReserveError;

/// Errors reported by fallible map and table operations.
///
/// A missing key is only an error for index-style access. `get`, `retrieve`,
/// `erase` and `count` report absence through their return values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Index-style access on a key that is not in the map.
    #[error("key not found")]
    KeyNotFound,
    /// Load factor thresholds must be finite and strictly positive.
    #[error("invalid max load factor {0}, expected a finite value > 0")]
    InvalidLoadFactor(f32),
    /// The requested table size does not fit in a `usize`.
    #[error("hash table capacity overflow")]
    CapacityOverflow,
    /// The allocator could not provide a new bucket array.
    #[error("bucket array allocation failed")]
    Alloc(#[from] TryReserveError),
}
