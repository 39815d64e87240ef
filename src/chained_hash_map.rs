//! ChainedHashMap: bucket array of singly-linked chains over a node arena.

use crate::error::MapError;
use crate::growth::{self, CAPACITIES};
use crate::reentrancy::DebugReentrancy;
use crate::strategy::{DefaultStrategy, KeyStrategy};
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    // Strategy hash captured at insertion; growth re-reduces it instead of
    // calling back into the strategy.
    hash: u64,
    next: Option<DefaultKey>,
}

/// Result of walking one chain for a key.
#[derive(Clone, Copy)]
struct Probe {
    slot: usize,
    prev: Option<DefaultKey>,
    found: Option<DefaultKey>,
}

/// A hash map resolving collisions by chaining, with pluggable key semantics.
///
/// Keys are placed with `KeyStrategy::hash` and compared with
/// `KeyStrategy::equals`; `DefaultStrategy` uses the key's own `Hash`/`Eq`.
/// The bucket array only grows, through a fixed table of prime capacities,
/// once the average chain length exceeds three.
///
/// Iteration order is bucket index ascending, then most recently inserted
/// first within a bucket.
pub struct ChainedHashMap<K, V, S = DefaultStrategy> {
    strategy: S,
    buckets: Box<[Option<DefaultKey>]>,
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    table: &'static [usize],
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_strategy(DefaultStrategy::new())
    }
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_table(strategy, CAPACITIES)
    }

    /// Like `with_strategy`, for callers holding an optional strategy.
    ///
    /// Fails with `MapError::InvalidArgument` when `strategy` is `None`.
    pub fn try_with_strategy(strategy: Option<S>) -> Result<Self, MapError> {
        strategy
            .map(Self::with_strategy)
            .ok_or(MapError::InvalidArgument("a key strategy is required"))
    }

    pub(crate) fn with_table(strategy: S, table: &'static [usize]) -> Self {
        debug_assert!(!table.is_empty());
        let capacity = table.first().copied().unwrap_or(1);
        trace!("creating chained hash map with {} buckets", capacity);
        Self {
            strategy,
            buckets: vec![None; capacity].into_boxed_slice(),
            nodes: SlotMap::with_key(),
            table,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current length of the bucket array.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Drop every entry. The bucket array keeps its current capacity.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.fill(None);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            nodes: &self.nodes,
            cur: None,
            remaining: self.nodes.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Chain length of every bucket, in bucket order.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(move |head| {
            let mut n = 0;
            let mut cur = *head;
            while let Some(k) = cur {
                n += 1;
                cur = self.nodes[k].next;
            }
            n
        })
    }

    /// Walk the bucket `key` maps to. The only place strategy code runs.
    fn probe<Q>(&self, key: &Q) -> (u64, Probe)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let _g = self.reentrancy.enter();
        let hash = self.strategy.hash(key);
        let slot = growth::bucket_index(hash, self.buckets.len());
        let mut prev = None;
        let mut cur = self.buckets[slot];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.hash == hash && self.strategy.equals(node.key.borrow(), key) {
                return (
                    hash,
                    Probe {
                        slot,
                        prev,
                        found: Some(k),
                    },
                );
            }
            prev = cur;
            cur = node.next;
        }
        (
            hash,
            Probe {
                slot,
                prev,
                found: None,
            },
        )
    }

    /// Prepend a new node to `slot`'s chain, then grow if chains got too long.
    fn link_front(&mut self, slot: usize, hash: u64, key: K, value: V) {
        let next = self.buckets[slot];
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next,
        });
        self.buckets[slot] = Some(k);
        if growth::should_grow(self.nodes.len(), self.buckets.len()) {
            self.grow();
        }
    }

    /// Move every node into a bucket array of the next table capacity.
    ///
    /// The new array is filled off to the side and swapped in with one
    /// assignment; nodes are relinked, never copied.
    ///
    /// # Panics
    ///
    /// Panics when the current capacity is the last one in the growth table.
    fn grow(&mut self) {
        let old = self.buckets.len();
        let new = growth::next_capacity(self.table, old);
        debug!(
            "growing bucket array from {} to {} ({} entries)",
            old,
            new,
            self.nodes.len()
        );
        let mut fresh: Box<[Option<DefaultKey>]> = vec![None; new].into_boxed_slice();
        for head in self.buckets.iter() {
            let mut cur = *head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next;
                let slot = growth::bucket_index(node.hash, new);
                node.next = fresh[slot];
                fresh[slot] = Some(k);
            }
        }
        self.buckets = fresh;
    }

    /// Insert a new entry. Fails with `MapError::DuplicateKey` if an equal
    /// key is already stored; the map is left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if the insert triggers growth past the last capacity of the
    /// growth table.
    pub fn add(&mut self, key: K, value: V) -> Result<(), MapError>
    where
        S: KeyStrategy<K>,
    {
        let (hash, probe) = self.probe(&key);
        if probe.found.is_some() {
            return Err(MapError::DuplicateKey);
        }
        self.link_front(probe.slot, hash, key, value);
        Ok(())
    }

    /// Insert or overwrite. Returns the replaced value when the key existed;
    /// the stored key is kept in that case.
    pub fn set(&mut self, key: K, value: V) -> Option<V>
    where
        S: KeyStrategy<K>,
    {
        let (hash, probe) = self.probe(&key);
        match probe.found {
            Some(k) => Some(core::mem::replace(&mut self.nodes[k].value, value)),
            None => {
                self.link_front(probe.slot, hash, key, value);
                None
            }
        }
    }

    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let (_, probe) = self.probe(key);
        probe.found.map(|k| &self.nodes[k].value)
    }

    /// Fails with `MapError::KeyNotFound` when `key` is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.try_get(key).ok_or(MapError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let (_, probe) = self.probe(key);
        probe.found.map(move |k| &mut self.nodes[k].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.probe(key).1.found.is_some()
    }

    /// Unlink `key` and hand its entry back.
    ///
    /// Absence is reported two ways: `Err(MapError::KeyMissing)` when the
    /// bucket `key` hashes to holds no chain at all, `Ok(None)` when that
    /// bucket has a chain but `key` is not on it. Capacity never shrinks.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<Option<(K, V)>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let (_, probe) = self.probe(key);
        if self.buckets[probe.slot].is_none() {
            return Err(MapError::KeyMissing);
        }
        let Some(node) = probe.found.and_then(|k| self.nodes.remove(k)) else {
            return Ok(None);
        };
        match probe.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.buckets[probe.slot] = node.next,
        }
        Ok(Some((node.key, node.value)))
    }

    /// `remove_entry` reduced to whether an entry was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<bool, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.remove_entry(key).map(|e| e.is_some())
    }
}

impl<K, Q, V, S> Index<&Q> for ChainedHashMap<K, V, S>
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: KeyStrategy<Q>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present; use `get` or `try_get` to handle absence.
    fn index(&self, key: &Q) -> &V {
        match self.try_get(key) {
            Some(v) => v,
            None => panic!("{}", MapError::KeyNotFound),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = Self::with_strategy(S::default());
        m.extend(iter);
        m
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(&K, &V)` pairs of a `ChainedHashMap`.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let nodes = self.nodes;
                let node = &nodes[k];
                self.cur = node.next;
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.cur = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            buckets: self.buckets.clone(),
            nodes: self.nodes,
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of a `ChainedHashMap`, in pair order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a `ChainedHashMap`, in pair order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}
