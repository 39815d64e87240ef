//! Key strategies: the pluggable hash + equality capability.
//!
//! A `ChainedHashMap` never calls `Hash`/`Eq` on its keys directly; every
//! bucket selection goes through `KeyStrategy::hash` and every chain probe
//! through `KeyStrategy::equals`. Swapping the strategy swaps key semantics
//! (for example, case-insensitive string keys) without touching the map.

use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::RandomState;
use std::rc::Rc;

/// Hash and equality for keys of type `Q`.
///
/// Contract: `equals(a, b)` implies `hash(a) == hash(b)`. The map relies on
/// this to pick a bucket and to skip nodes whose stored hash differs; a
/// strategy that breaks it makes lookups miss silently.
///
/// When a map stores `K` and is queried with `&Q` where `K: Borrow<Q>`, the
/// strategy must hash and compare `k.borrow()` the same way it treats `k`.
pub trait KeyStrategy<Q: ?Sized> {
    fn hash(&self, key: &Q) -> u64;
    fn equals(&self, a: &Q, b: &Q) -> bool;
}

/// Native semantics: `Hash` through a `BuildHasher`, and `Eq`.
#[derive(Clone, Debug, Default)]
pub struct DefaultStrategy<B = RandomState> {
    build: B,
}

impl DefaultStrategy {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<B> DefaultStrategy<B> {
    pub fn with_hasher(build: B) -> Self {
        Self { build }
    }
}

impl<Q, B> KeyStrategy<Q> for DefaultStrategy<B>
where
    Q: ?Sized + Hash + Eq,
    B: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &Q) -> u64 {
        self.build.hash_one(key)
    }

    #[inline]
    fn equals(&self, a: &Q, b: &Q) -> bool {
        a == b
    }
}

/// Case-insensitive string keys.
///
/// Both operations work on the Unicode-lowercased character stream, so
/// `"Paul"`, `"paul"` and `"PAUL"` hash and compare identically.
#[derive(Clone, Debug, Default)]
pub struct CaseInsensitive<B = RandomState> {
    build: B,
}

impl CaseInsensitive {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<B> CaseInsensitive<B> {
    pub fn with_hasher(build: B) -> Self {
        Self { build }
    }
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

impl<Q, B> KeyStrategy<Q> for CaseInsensitive<B>
where
    Q: ?Sized + AsRef<str>,
    B: BuildHasher,
{
    fn hash(&self, key: &Q) -> u64 {
        let mut h = self.build.build_hasher();
        for c in folded(key.as_ref()) {
            h.write_u32(c as u32);
        }
        h.finish()
    }

    fn equals(&self, a: &Q, b: &Q) -> bool {
        folded(a.as_ref()).eq(folded(b.as_ref()))
    }
}

// Externally owned strategies: the map holds a handle, the caller keeps the
// strategy itself.

impl<Q: ?Sized, S: KeyStrategy<Q> + ?Sized> KeyStrategy<Q> for &S {
    #[inline]
    fn hash(&self, key: &Q) -> u64 {
        (**self).hash(key)
    }
    #[inline]
    fn equals(&self, a: &Q, b: &Q) -> bool {
        (**self).equals(a, b)
    }
}

impl<Q: ?Sized, S: KeyStrategy<Q> + ?Sized> KeyStrategy<Q> for Rc<S> {
    #[inline]
    fn hash(&self, key: &Q) -> u64 {
        (**self).hash(key)
    }
    #[inline]
    fn equals(&self, a: &Q, b: &Q) -> bool {
        (**self).equals(a, b)
    }
}

impl<Q: ?Sized, S: KeyStrategy<Q> + ?Sized> KeyStrategy<Q> for Box<S> {
    #[inline]
    fn hash(&self, key: &Q) -> u64 {
        (**self).hash(key)
    }
    #[inline]
    fn equals(&self, a: &Q, b: &Q) -> bool {
        (**self).equals(a, b)
    }
}
