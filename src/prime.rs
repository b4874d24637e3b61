//! Prime helpers used to size bucket arrays.
//!
//! Bucket counts are kept prime so that `hash % table_size` mixes every bit of
//! the hash, even for hashers with weak low bits.

/// Returns `true` if `n` is prime.
///
/// Plain trial division up to `⌊√n⌋`; numbers below 2 are not prime.
///
/// # Examples
///
/// ```rust
/// use chain_hash::prime::is_prime;
///
/// assert!(is_prime(11));
/// assert!(!is_prime(10));
/// assert!(!is_prime(1));
/// ```
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor = 3;
    // `divisor <= n / divisor` is `divisor * divisor <= n` without overflow.
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }

    true
}

/// Returns the smallest prime greater than or equal to `n`.
///
/// Returns `None` only if no such prime fits in a `usize`.
///
/// # Examples
///
/// ```rust
/// use chain_hash::prime::next_prime_at_least;
///
/// assert_eq!(next_prime_at_least(10), Some(11));
/// assert_eq!(next_prime_at_least(11), Some(11));
/// assert_eq!(next_prime_at_least(0), Some(2));
/// ```
pub fn next_prime_at_least(n: usize) -> Option<usize> {
    if n <= 2 {
        return Some(2);
    }

    // usize::MAX is odd, so `n + 1` cannot overflow for an even `n`.
    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(2)?;
    }
}
