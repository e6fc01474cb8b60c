use crate::fft::{permutation::DigitReversal, twiddle::Twiddles, Direction};
use core::{fmt::Debug, hash::Hash};
use num_traits::{AsPrimitive, Float, FloatConst};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Per-size tables shared by every transform run through one engine.
///
/// A table is built while its map is locked and then published behind an
/// [`Arc`], so each key is built at most once and callers only ever see
/// complete tables. Entries live as long as the cache.
#[derive(Debug)]
pub struct TableCache<T> {
    permutations: Memo<u32, DigitReversal>,
    twiddles: Memo<(u32, Direction), Twiddles<T>>,
}

impl<T> Default for TableCache<T> {
    fn default() -> Self {
        Self {
            permutations: Memo::default(),
            twiddles: Memo::default(),
        }
    }
}

impl<T> TableCache<T> {
    pub fn permutation(&self, log_n: u32) -> Arc<DigitReversal> {
        self.permutations
            .get_or_insert_with(log_n, || DigitReversal::new(log_n))
    }

    pub fn contains_permutation(&self, log_n: u32) -> bool {
        self.permutations.contains(&log_n)
    }

    pub fn contains_twiddles(&self, log_n: u32, direction: Direction) -> bool {
        self.twiddles.contains(&(log_n, direction))
    }

    pub fn permutation_count(&self) -> usize {
        self.permutations.len()
    }

    pub fn twiddle_count(&self) -> usize {
        self.twiddles.len()
    }
}

impl<T> TableCache<T>
where
    T: Float + FloatConst + 'static,
    usize: AsPrimitive<T>,
{
    pub fn twiddles(&self, log_n: u32, direction: Direction) -> Arc<Twiddles<T>> {
        self.twiddles
            .get_or_insert_with((log_n, direction), || Twiddles::new(log_n, direction))
    }
}

struct Memo<K, V>(Mutex<HashMap<K, Arc<V>>>);

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self(Mutex::new(HashMap::new()))
    }
}

impl<K: Debug, V> Debug for Memo<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_set().entries(map.keys()).finish()
    }
}

impl<K: Eq + Hash, V> Memo<K, V> {
    // The map is only written after `build` returns, so a panic while building
    // leaves it consistent and a poisoned lock can be reused.
    fn get_or_insert_with(&self, key: K, build: impl FnOnce() -> V) -> Arc<V> {
        let mut map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(key).or_insert_with(|| Arc::new(build())).clone()
    }

    fn contains(&self, key: &K) -> bool {
        let map = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
