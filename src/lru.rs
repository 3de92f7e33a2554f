//! A persistent LRU cache.

use std::sync::Arc;

use crate::list::List;
use crate::map::Map;

type PurgeFn<K, V, U> = dyn Fn(&LruCache<K, V, U>, &U) -> bool + Send + Sync;

/// An immutable least-recently-used cache.
///
/// The cache pairs a value map `K -> (seq, V)` with a recency map
/// `seq -> K`, where `seq` is a monotonically increasing use counter, so
/// the oldest entry is always at the front of the recency map.  Inserting
/// runs a caller-supplied purge predicate and evicts oldest entries while
/// it holds; [`with_max_size`](LruCache::with_max_size) installs the usual
/// "too many entries" predicate.
///
/// The predicate can depend on caller state of type `U`, threaded through
/// [`insert_with`](LruCache::insert_with) and [`purge`](LruCache::purge).
/// Caches built with a plain size limit use `U = ()` and the simpler
/// [`insert`](LruCache::insert).
///
/// # Examples
/// ```
/// use twothree_collections::LruCache;
///
/// let c = LruCache::with_max_size(2).insert(1, "a").insert(2, "b");
/// let c = c.touch(&1);           // 1 is now freshest
/// let c = c.insert(3, "c");      // evicts 2, the oldest
/// assert_eq!(c.get(&1), Some(&"a"));
/// assert_eq!(c.get(&2), None);
/// assert_eq!(c.get(&3), Some(&"c"));
/// ```
pub struct LruCache<K, V, U = ()> {
    values: Map<K, (i64, V)>,
    recency: Map<i64, K>,
    next_seq: i64,
    purge_when: Arc<PurgeFn<K, V, U>>,
}

impl<K: Clone, V: Clone, U> Clone for LruCache<K, V, U> {
    fn clone(&self) -> Self {
        LruCache {
            values: self.values.clone(),
            recency: self.recency.clone(),
            next_seq: self.next_seq,
            purge_when: Arc::clone(&self.purge_when),
        }
    }
}

impl<K: Clone + Ord, V: Clone> LruCache<K, V, ()> {
    /// Creates a cache that evicts oldest entries once it holds more than
    /// `max_size` of them.
    pub fn with_max_size(max_size: usize) -> Self {
        LruCache::with_purge(move |cache, _| cache.len() > max_size)
    }

    /// Inserts and touches; see [`insert_with`](LruCache::insert_with).
    pub fn insert(&self, k: K, v: V) -> Self {
        self.insert_with(k, v, &())
    }
}

impl<K: Clone + Ord, V: Clone, U> LruCache<K, V, U> {
    /// Creates a cache with a caller-supplied purge predicate.  After each
    /// insert the oldest entry is evicted for as long as the predicate
    /// returns true.
    pub fn with_purge<F>(purge_when: F) -> Self
    where
        F: Fn(&Self, &U) -> bool + Send + Sync + 'static,
    {
        LruCache {
            values: Map::new(),
            recency: Map::new(),
            next_seq: 0,
            purge_when: Arc::new(purge_when),
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Tests whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Passive lookup: returns the value at `k` without touching it.
    pub fn get(&self, k: &K) -> Option<&V> {
        self.values.get(k).map(|(_, v)| v)
    }

    /// Makes `k` the most recently used entry; no-op if `k` is absent.
    pub fn touch(&self, k: &K) -> Self {
        match self.values.get(k) {
            Some((old_seq, v)) => {
                let seq = self.next_seq;
                LruCache {
                    values: self.values.insert(k.clone(), (seq, v.clone())),
                    recency: self
                        .recency
                        .remove(old_seq)
                        .insert(seq, k.clone()),
                    next_seq: seq + 1,
                    purge_when: Arc::clone(&self.purge_when),
                }
            }
            None => self.clone(),
        }
    }

    /// Inserts `(k, v)` and touches `k`, then evicts oldest entries while
    /// the purge predicate holds against the user state `u`.
    pub fn insert_with(&self, k: K, v: V, u: &U) -> Self {
        let seq = self.next_seq;
        let cache = match self.values.get(&k) {
            // exists already: update the value and touch
            Some((old_seq, _)) => LruCache {
                values: self.values.insert(k.clone(), (seq, v)),
                recency: self.recency.remove(old_seq).insert(seq, k),
                next_seq: seq + 1,
                purge_when: Arc::clone(&self.purge_when),
            },
            None => LruCache {
                values: self.values.insert(k.clone(), (seq, v)),
                recency: self.recency.insert(seq, k),
                next_seq: seq + 1,
                purge_when: Arc::clone(&self.purge_when),
            },
        };
        cache.purge(u)
    }

    /// Drops the entry at `k`, or returns the cache unchanged when `k` is
    /// absent.
    ///
    /// `remove` does not re-run the purge predicate: the predicate takes a
    /// `&U` and none is available here.  Call [`purge`](LruCache::purge)
    /// afterwards if the predicate depends on external state.
    pub fn remove(&self, k: &K) -> Self {
        match self.values.get(k) {
            Some((old_seq, _)) => LruCache {
                values: self.values.remove(k),
                recency: self.recency.remove(old_seq),
                next_seq: self.next_seq,
                purge_when: Arc::clone(&self.purge_when),
            },
            None => self.clone(),
        }
    }

    /// The least recently used key, or `None` if the cache is empty.
    pub fn oldest(&self) -> Option<&K> {
        self.recency.first_key_value().map(|(_, k)| k)
    }

    /// Evicts oldest entries while the purge predicate holds.  Only needed
    /// explicitly when the predicate depends on state that changes outside
    /// the cache (time is the common example).
    pub fn purge(&self, u: &U) -> Self {
        let mut cache = self.clone();
        while let Some(k) = cache.oldest().cloned() {
            if (cache.purge_when)(&cache, u) {
                cache = cache.remove(&k);
            } else {
                break;
            }
        }
        cache
    }

    /// The `(key, value)` pairs in ascending *key* order.
    pub fn to_list(&self) -> List<(K, V)> {
        self.values
            .iter()
            .map(|(k, (_, v))| (k.clone(), v.clone()))
            .collect()
    }

    // Test hook: the seqs recorded in `values` and the keys of `recency`
    // must mirror each other exactly.
    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let vseqs: Vec<i64> = {
            let mut s: Vec<i64> =
                self.values.iter().map(|(_, (seq, _))| *seq).collect();
            s.sort_unstable();
            s
        };
        let rseqs: Vec<i64> = self.recency.iter().map(|(s, _)| *s).collect();
        vseqs == rseqs
            && self
                .recency
                .iter()
                .all(|(seq, k)| {
                    self.values.get(k).map(|(s, _)| s) == Some(seq)
                })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs<K: Clone + Ord, V: Clone, U>(
        c: &LruCache<K, V, U>,
    ) -> Vec<(K, V)> {
        c.to_list().iter().cloned().collect()
    }

    // walk the cache oldest-first through oldest()/remove()
    fn recency_order<K: Clone + Ord, V: Clone, U>(
        c: &LruCache<K, V, U>,
    ) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = c.clone();
        while let Some(k) = cur.oldest().cloned() {
            out.push(k.clone());
            cur = cur.remove(&k);
        }
        out
    }

    #[test]
    fn no_eviction_below_the_limit() {
        let c = LruCache::with_max_size(10)
            .insert(10, 'a')
            .insert(5, 'b')
            .insert(7, 'c')
            .insert(8, 'd');
        assert!(c.is_consistent());
        assert_eq!(
            pairs(&c),
            vec![(5, 'b'), (7, 'c'), (8, 'd'), (10, 'a')]
        );
    }

    #[test]
    fn insert_evicts_the_oldest() {
        let c = LruCache::with_max_size(4)
            .insert(10, "a")
            .insert(5, "b")
            .insert(7, "c")
            .insert(8, "d")
            .insert(12, "e");
        assert!(c.is_consistent());
        assert_eq!(
            pairs(&c),
            vec![(5, "b"), (7, "c"), (8, "d"), (12, "e")]
        );
        assert_eq!(recency_order(&c), vec![5, 7, 8, 12]);
    }

    #[test]
    fn two_inserts_evict_two() {
        let c = LruCache::with_max_size(4)
            .insert(10, "a")
            .insert(5, "b")
            .insert(7, "c")
            .insert(8, "d")
            .insert(12, "e")
            .insert(1, "f");
        assert!(c.is_consistent());
        assert_eq!(
            pairs(&c),
            vec![(1, "f"), (7, "c"), (8, "d"), (12, "e")]
        );
        assert_eq!(recency_order(&c), vec![7, 8, 12, 1]);
    }

    #[test]
    fn touch_protects_from_eviction() {
        let c = LruCache::with_max_size(4)
            .insert(10, "a")
            .insert(5, "b")
            .insert(7, "c")
            .insert(8, "d")
            .touch(&10)
            .insert(12, "e")
            .insert(1, "f");
        assert!(c.is_consistent());
        assert_eq!(
            pairs(&c),
            vec![(1, "f"), (8, "d"), (10, "a"), (12, "e")]
        );
    }

    #[test]
    fn touch_of_an_evicted_key_is_a_noop() {
        // 10 is already gone by the time it is touched, so the touch
        // changes nothing and 5 is the next eviction victim
        let c = LruCache::with_max_size(4)
            .insert(10, "a")
            .insert(5, "b")
            .insert(7, "c")
            .insert(8, "d")
            .insert(12, "e")
            .touch(&10)
            .insert(1, "f");
        assert!(c.is_consistent());
        assert_eq!(
            pairs(&c),
            vec![(1, "f"), (7, "c"), (8, "d"), (12, "e")]
        );
        assert_eq!(recency_order(&c), vec![7, 8, 12, 1]);
    }

    #[test]
    fn remove_then_churn() {
        let c = LruCache::with_max_size(4)
            .insert(10, "a")
            .insert(5, "b")
            .insert(7, "c")
            .insert(8, "d")
            .remove(&5)
            .insert(12, "e")
            .touch(&10)
            .insert(1, "f");
        assert!(c.is_consistent());
        assert_eq!(
            pairs(&c),
            vec![(1, "f"), (8, "d"), (10, "a"), (12, "e")]
        );
    }

    #[test]
    fn size_never_exceeds_the_limit() {
        let mut c = LruCache::with_max_size(4);
        for i in 0..100 {
            c = c.insert(i % 7, i);
            assert!(c.len() <= 4);
            assert!(c.is_consistent());
        }
    }

    #[test]
    fn lookup_does_not_touch() {
        let c = LruCache::with_max_size(2).insert(1, 'a').insert(2, 'b');
        assert_eq!(c.get(&1), Some(&'a'));
        // 1 is still the oldest despite the lookup
        assert_eq!(c.oldest(), Some(&1));
    }

    #[test]
    fn user_state_threads_through_purge() {
        // keep entries whose total value stays under a caller budget
        let c: LruCache<i32, i32, i32> =
            LruCache::with_purge(|cache, budget: &i32| {
                let total: i32 =
                    cache.to_list().iter().map(|(_, v)| v).sum();
                total > *budget
            });

        let c = c
            .insert_with(1, 60, &100)
            .insert_with(2, 30, &100)
            .insert_with(3, 30, &100); // 120 > 100: evict 1, then 60 <= 100
        assert!(c.is_consistent());
        assert_eq!(pairs(&c), vec![(2, 30), (3, 30)]);

        // tighter budget applied explicitly
        let c = c.purge(&40);
        assert_eq!(pairs(&c), vec![(3, 30)]);
    }

    #[test]
    fn snapshots_are_isolated() {
        let a = LruCache::with_max_size(4).insert(1, 'a').insert(2, 'b');
        let b = a.insert(3, 'c').touch(&1);
        assert_eq!(pairs(&a), vec![(1, 'a'), (2, 'b')]);
        assert_eq!(recency_order(&a), vec![1, 2]);
        assert_eq!(recency_order(&b), vec![2, 3, 1]);
    }
}
