//! A persistent ordered multimap.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::list::List;
use crate::set::{self, Set};
use crate::supply::Supply;

// Entries are ordered by key, then by a tag drawn from a unique-value
// supply.  No two live entries ever compare equal, which is what lets
// duplicate keys coexist in the underlying set.
#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    tag: i64,
    val: V,
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.tag == other.tag
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

impl<K: Ord, V> PartialOrd for Entry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for Entry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

/// An immutable map from keys to values in which duplicate keys coexist.
///
/// Every entry carries a tag taken from a [`Supply`], so entries with equal
/// keys stay distinct; within one key, entries appear in tag order, which
/// for sequential inserts is insertion order.  To visit all values of a
/// key, take [`lower_bound`](MultiMap::lower_bound) and follow
/// [`next`](Cursor::next) while the key matches.
///
/// # Examples
/// ```
/// use twothree_collections::MultiMap;
///
/// let m = MultiMap::new().insert(1, "a").insert(1, "b").insert(2, "c");
/// assert_eq!(m.len(), 3);
///
/// let mut vals = Vec::new();
/// let mut cur = m.lower_bound(&1);
/// while let Some(c) = cur {
///     if *c.key() != 1 {
///         break;
///     }
///     vals.push(*c.value());
///     cur = c.next();
/// }
/// assert_eq!(vals, ["a", "b"]);
/// ```
#[derive(Clone, Debug)]
pub struct MultiMap<K, V> {
    entries: Set<Entry<K, V>>,
    // this supply's own value is considered spent; always split before use
    supply: Supply<i64>,
}

impl<K, V> MultiMap<K, V> {
    /// Creates an empty multimap.
    pub fn new() -> Self {
        MultiMap {
            entries: Set::new(),
            supply: Supply::new(0),
        }
    }

    /// Returns the number of entries (duplicates included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tests whether the multimap is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Clone + Ord, V: Clone> MultiMap<K, V> {
    /// Returns a new multimap with `(k, v)` added.  Existing entries for
    /// `k` are kept; the new entry sorts after them.
    pub fn insert(&self, k: K, v: V) -> Self {
        let (fresh, rest) = self.supply.split2();
        let tag = fresh.get();
        MultiMap {
            entries: self.entries.insert(Entry {
                key: k,
                tag,
                val: v,
            }),
            supply: rest,
        }
    }

    /// Returns a new multimap without the *first* entry for `k` (the one
    /// with the smallest tag, i.e. the earliest-allocated), or an
    /// unchanged multimap when `k` is absent.
    pub fn remove(&self, k: &K) -> Self {
        match self.lower_bound(k) {
            Some(cur) if cur.key() == k => cur.remove(),
            _ => self.clone(),
        }
    }

    /// Tests whether any entry has the key `k`.
    pub fn contains_key(&self, k: &K) -> bool {
        matches!(self.lower_bound(k), Some(cur) if cur.key() == k)
    }

    /// Cursor at the first entry, if any.
    pub fn begin(&self) -> Option<Cursor<K, V>> {
        self.cursor(self.entries.begin())
    }

    /// Cursor at the last entry, if any.
    pub fn end(&self) -> Option<Cursor<K, V>> {
        self.cursor(self.entries.end())
    }

    /// Cursor at the first entry whose key is `>=` the pivot, or `None` if
    /// every key is smaller.
    pub fn lower_bound(&self, k: &K) -> Option<Cursor<K, V>> {
        // probe as (k, tag 0): tags are never negative, so this sorts at
        // the front of the key's run
        self.cursor(self.entries.lower_bound_by(&|e: &Entry<K, V>| {
            e.key.cmp(k).then_with(|| e.tag.cmp(&0))
        }))
    }

    /// Cursor at the last entry whose key is `<=` the pivot, or `None` if
    /// every key is larger.
    pub fn upper_bound(&self, k: &K) -> Option<Cursor<K, V>> {
        match self.lower_bound(k) {
            Some(cur) => {
                if cur.key() > k {
                    cur.prev()
                } else {
                    // walk to the last entry of the key's run
                    let mut cur = cur;
                    loop {
                        match cur.next() {
                            Some(n) if n.key() == k => cur = n,
                            _ => return Some(cur),
                        }
                    }
                }
            }
            None => self.end(),
        }
    }

    /// The `(key, value)` pairs in key order (ties in tag order).
    pub fn to_list(&self) -> List<(K, V)> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.val.clone()))
            .collect()
    }

    /// The keys in order, one per entry (duplicates included).
    pub fn keys(&self) -> List<K> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    /// The values in key order.
    pub fn values(&self) -> List<V> {
        self.entries.iter().map(|e| e.val.clone()).collect()
    }

    /// Keeps the entries whose value satisfies `pred`.
    pub fn filter<F: FnMut(&V) -> bool>(&self, mut pred: F) -> Self {
        self.filter_with_key(|_, v| pred(v))
    }

    /// Keeps the entries satisfying `pred`.
    pub fn filter_with_key<F>(&self, mut pred: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| pred(&e.key, &e.val))
            .fold(MultiMap::new(), |m, e| {
                m.insert(e.key.clone(), e.val.clone())
            })
    }

    /// Maps `f` over the values, keeping keys and multiplicity.
    pub fn map_values<W, F>(&self, mut f: F) -> MultiMap<K, W>
    where
        W: Clone,
        F: FnMut(&V) -> W,
    {
        self.entries.iter().fold(MultiMap::new(), |m, e| {
            m.insert(e.key.clone(), f(&e.val))
        })
    }

    /// Monoidal append: all entries of both operands.
    pub fn union(&self, other: &Self) -> Self {
        other.entries.iter().fold(self.clone(), |m, e| {
            m.insert(e.key.clone(), e.val.clone())
        })
    }

    fn cursor(&self, inner: Option<set::Cursor<Entry<K, V>>>) -> Option<Cursor<K, V>> {
        inner.map(|inner| Cursor {
            inner,
            supply: self.supply.clone(),
        })
    }
}

impl<K, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        MultiMap::new()
    }
}

// Equality compares the (key, value) sequences; tags are bookkeeping and
// deliberately ignored.
impl<K, V> PartialEq for MultiMap<K, V>
where
    K: Clone + PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.key == b.key && a.val == b.val)
    }
}

impl<K: Clone + Eq, V: Eq> Eq for MultiMap<K, V> {}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MultiMap::new(), |m, (k, v)| m.insert(k, v))
    }
}

impl<K: Clone + Ord, V: Clone> std::ops::Add for MultiMap<K, V> {
    type Output = MultiMap<K, V>;

    fn add(self, other: Self) -> Self {
        self.union(&other)
    }
}

impl<K: Display + Clone, V: Display> Display for MultiMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "{} -> {}", e.key, e.val)?;
        }
        f.write_str("}")
    }
}

/// A persistent cursor into a [`MultiMap`].
#[derive(Clone)]
pub struct Cursor<K, V> {
    inner: set::Cursor<Entry<K, V>>,
    supply: Supply<i64>,
}

impl<K: Clone, V: Clone> Cursor<K, V> {
    /// The key of the current entry.
    pub fn key(&self) -> &K {
        &self.inner.get().key
    }

    /// The value of the current entry.
    pub fn value(&self) -> &V {
        &self.inner.get().val
    }

    /// Cursor at the next entry, if any.
    pub fn next(&self) -> Option<Self> {
        self.inner.next().map(|inner| Cursor {
            inner,
            supply: self.supply.clone(),
        })
    }

    /// Cursor at the previous entry, if any.
    pub fn prev(&self) -> Option<Self> {
        self.inner.prev().map(|inner| Cursor {
            inner,
            supply: self.supply.clone(),
        })
    }

    /// The multimap that results from removing the current entry.
    pub fn remove(&self) -> MultiMap<K, V> {
        MultiMap {
            entries: self.inner.remove(),
            supply: self.supply.clone(),
        }
    }
}
