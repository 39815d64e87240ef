//! chain-hashmap: a single-threaded, separate-chaining hash map whose key
//! semantics come from an injected hash + equality strategy.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable associative container that can stand in
//!   as a building block, with key comparison pluggable at construction
//!   (for example case-insensitive string keys).
//! - Layers:
//!   - KeyStrategy<Q>: two operations, `hash` and `equals`. The map calls
//!     nothing else on its keys. `DefaultStrategy` forwards to `Hash`/`Eq`.
//!   - Growth policy: a fixed table of prime capacities
//!     (11, 23, 47, 97, 199, 397, 809, ...) and a trigger of "average chain
//!     length above 3".
//!   - ChainedHashMap<K, V, S>: bucket array of chain heads over a node
//!     arena; every operation hashes, reduces to a bucket, then walks that
//!     bucket's chain.
//!
//! Storage
//! - Nodes live in a `SlotMap`; bucket heads and `next` links are arena
//!   keys, so chains are plain acyclic handle lists with no raw pointers.
//! - New nodes are prepended to their chain. Iteration goes bucket by
//!   bucket, most recently inserted first within a bucket.
//! - `len()` is the arena size, so it always equals the number of nodes
//!   reachable from the buckets.
//!
//! Hashing and rehashing invariants
//! - `KeyStrategy::hash` returns `u64` and buckets are `hash % capacity`.
//!   There is no signed value to take an absolute value of.
//! - Each node keeps the hash computed at insertion. Growth re-reduces the
//!   stored hash against the new capacity, so the strategy is never called
//!   mid-rehash, and chain walks skip nodes whose stored hash differs before
//!   calling `equals`.
//! - Growth fills a new bucket array off to the side and swaps it in with a
//!   single assignment. The capacity never shrinks.
//!
//! Failure policy
//! - `add` of an existing key: `MapError::DuplicateKey`.
//! - `get` of a missing key: `MapError::KeyNotFound`; `try_get` returns `None`.
//! - `remove` fails with `MapError::KeyMissing` only when the key's bucket
//!   has no chain at all. A miss inside an occupied bucket returns
//!   `Ok(false)`. This asymmetry is kept on purpose so callers relying on
//!   either report keep working.
//! - Growing past the last table capacity panics. The table is a design
//!   limit (about 1.7 billion buckets), not a recoverable condition.
//!
//! Reentrancy
//! - A debug-only guard wraps every chain walk. A strategy that calls back
//!   into the map it serves panics in debug builds; release builds pay
//!   nothing.
//!
//! Notes and non-goals
//! - Single-threaded. The map is `Send` when its contents are, never
//!   `Sync`; share it across threads behind a lock.
//! - No shrinking, no caller-tuned load factor, no ordered iteration.
//! - The strategy is fixed for the lifetime of the map.

mod chained_hash_map;
#[cfg(test)]
mod chained_hash_map_proptest;
mod error;
mod growth;
mod reentrancy;
#[cfg(feature = "stats")]
mod stats;
mod strategy;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Iter, Keys, Values};
pub use error::MapError;
#[cfg(feature = "stats")]
pub use stats::ChainStats;
pub use strategy::{CaseInsensitive, DefaultStrategy, KeyStrategy};
