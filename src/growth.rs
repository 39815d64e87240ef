//! Bucket-array growth policy.
//!
//! Capacities come from a fixed ascending table of primes rather than from
//! doubling, so the observable capacity after N inserts is fully
//! deterministic. Each entry is the first prime at or above `2p + 1` of the
//! previous one. The table is a hard design limit: growing past its last
//! entry is fatal (see `next_capacity`).

/// Bucket-array capacities, smallest first. A new map starts at `CAPACITIES[0]`.
pub(crate) const CAPACITIES: &[usize] = &[
    11, 23, 47, 97, 199, 397, 809, 1619, 3251, 6521, 13043, 26099, 52201, 104417, 208837,
    417691, 835391, 1670783, 3341579, 6683161, 13366387, 26732813, 53465683, 106931401,
    213862811, 427725629, 855451273, 1710902551,
];

/// Average chain length the table tolerates before growing.
pub(crate) const MAX_AVERAGE_CHAIN: usize = 3;

/// True once the average chain length `len / capacity` is strictly above
/// `MAX_AVERAGE_CHAIN`.
#[inline]
pub(crate) fn should_grow(len: usize, capacity: usize) -> bool {
    len > MAX_AVERAGE_CHAIN.saturating_mul(capacity)
}

/// The first capacity in `table` strictly greater than `current`.
///
/// # Panics
///
/// Panics when `current` is already at (or past) the last entry of `table`.
/// The table bounds how far a map can grow; reaching its end is a
/// capacity-planning failure, not a recoverable condition.
pub(crate) fn next_capacity(table: &[usize], current: usize) -> usize {
    match table.iter().copied().find(|&c| c > current) {
        Some(c) => c,
        None => panic!(
            "chained hash map growth table exhausted: no capacity above {}",
            current
        ),
    }
}

/// Reduce a strategy hash to a bucket index.
///
/// The hash is unsigned, so there is no sign to strip before the modulo.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}
