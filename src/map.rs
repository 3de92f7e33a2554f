//! A persistent ordered map.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::iter::FusedIterator;

use crate::list::List;
use crate::set::{self, Set};

// A map is a set of entries ordered by key alone, so inserting an entry
// with an existing key replaces the old entry wholesale.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
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
        self.key.cmp(&other.key)
    }
}

/// An immutable map from keys to values, sorted by key.
///
/// A `Map` is a [`Set`] of `(key, value)` entries compared by key only.
/// Like every container in this crate it is persistent: updates return a
/// new map sharing structure with the old one, and snapshots never change
/// underneath you.
///
/// # Examples
/// ```
/// use twothree_collections::Map;
///
/// let m = Map::new().insert(1, "one").insert(2, "two");
/// let n = m.insert(1, "uno");
///
/// assert_eq!(m.get(&1), Some(&"one"));
/// assert_eq!(n.get(&1), Some(&"uno"));
/// ```
#[derive(Clone)]
pub struct Map<K, V> {
    entries: Set<Entry<K, V>>,
}

impl<K, V> Map<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Map {
            entries: Set::new(),
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tests whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns the entry with the least key, or `None` if the map is empty.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|e| (&e.key, &e.val))
    }

    /// Returns the entry with the greatest key, or `None` if empty.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|e| (&e.key, &e.val))
    }
}

impl<K: Clone + Ord, V: Clone> Map<K, V> {
    /// Returns the value at `k`, if any.
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .get_by(|e| e.key.borrow().cmp(k))
            .map(|e| &e.val)
    }

    /// Returns a clone of the value at `k`, if any.
    pub fn lookup<Q>(&self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(k).cloned()
    }

    /// Tests whether the map contains the key `k`.
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(k).is_some()
    }

    /// Returns a new map with `k` bound to `v`, replacing any existing
    /// binding for `k`.
    pub fn insert(&self, k: K, v: V) -> Self {
        Map {
            entries: self.entries.insert(Entry { key: k, val: v }),
        }
    }

    /// Returns a new map without the binding for `k`, or an unchanged map
    /// when `k` is absent.
    pub fn remove<Q>(&self, k: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find(k) {
            Some(cur) => cur.remove(),
            None => self.clone(),
        }
    }

    /// Cursor at the entry for `k`, if present.
    pub fn find<Q>(&self, k: &Q) -> Option<Cursor<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .find_by(&|e: &Entry<K, V>| e.key.borrow().cmp(k))
            .map(|inner| Cursor { inner })
    }

    /// Cursor at the entry with the smallest key `>=` the pivot, or `None`
    /// if every key is smaller.
    pub fn lower_bound<Q>(&self, k: &Q) -> Option<Cursor<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .lower_bound_by(&|e: &Entry<K, V>| e.key.borrow().cmp(k))
            .map(|inner| Cursor { inner })
    }

    /// Cursor at the entry with the largest key `<=` the pivot, or `None`
    /// if every key is larger.  (Not the C++ STL convention; the mirror
    /// image of [`lower_bound`](Map::lower_bound).)
    pub fn upper_bound<Q>(&self, k: &Q) -> Option<Cursor<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .upper_bound_by(&|e: &Entry<K, V>| e.key.borrow().cmp(k))
            .map(|inner| Cursor { inner })
    }

    /// Cursor at the entry with the least key, or `None` if empty.
    pub fn begin(&self) -> Option<Cursor<K, V>> {
        self.entries.begin().map(|inner| Cursor { inner })
    }

    /// Cursor at the entry with the greatest key, or `None` if empty.
    pub fn end(&self) -> Option<Cursor<K, V>> {
        self.entries.end().map(|inner| Cursor { inner })
    }

    /// Rewrites the binding at `k` through `f`, which receives the current
    /// value (if any) and returns the new value (or `None` to delete).
    pub fn alter<F>(&self, k: K, f: F) -> Self
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        match self.find(&k) {
            Some(cur) => match f(Some(cur.value())) {
                Some(v) => self.insert(k, v),
                None => cur.remove(),
            },
            None => match f(None) {
                Some(v) => self.insert(k, v),
                None => self.clone(),
            },
        }
    }

    /// Applies `f` to the value at `k` if it is present; no-op otherwise.
    pub fn adjust<F>(&self, k: &K, f: F) -> Self
    where
        F: FnOnce(&V) -> V,
    {
        match self.get(k) {
            Some(v) => self.insert(k.clone(), f(v)),
            None => self.clone(),
        }
    }

    /// The keys in ascending order.
    pub fn keys(&self) -> List<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// The values in ascending key order.
    pub fn elems(&self) -> List<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    /// The `(key, value)` pairs in ascending key order.
    pub fn to_list(&self) -> List<(K, V)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Maps `f` over the values, keeping the keys.
    pub fn map_values<W, F>(&self, mut f: F) -> Map<K, W>
    where
        W: Clone,
        F: FnMut(&V) -> W,
    {
        self.iter()
            .fold(Map::new(), |m, (k, v)| m.insert(k.clone(), f(v)))
    }

    /// Folds the entries in ascending key order.
    pub fn foldl<B, F: FnMut(B, &K, &V) -> B>(&self, mut f: F, init: B) -> B {
        self.iter().fold(init, |b, (k, v)| f(b, k, v))
    }

    /// Monoidal append = map union.  Bindings in `other` win over equal
    /// keys in `self`.
    pub fn union(&self, other: &Self) -> Self {
        other
            .iter()
            .fold(self.clone(), |m, (k, v)| m.insert(k.clone(), v.clone()))
    }
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Map::new()
    }
}

impl<K, V> PartialEq for Map<K, V>
where
    K: Clone + PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Clone + Eq, V: Eq> Eq for Map<K, V> {}

impl<K: Debug, V: Debug> Debug for Map<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Display, V: Display> Display for Map<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "{k} -> {v}")?;
        }
        f.write_str("}")
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Map::new(), |m, (k, v)| m.insert(k, v))
    }
}

impl<K: Clone + Ord, V: Clone> Extend<(K, V)> for Map<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            *self = self.insert(k, v);
        }
    }
}

impl<K: Clone + Ord, V: Clone> std::ops::Add for Map<K, V> {
    type Output = Map<K, V>;

    fn add(self, other: Self) -> Self {
        self.union(&other)
    }
}

/// A persistent cursor into a [`Map`].
#[derive(Clone)]
pub struct Cursor<K, V> {
    inner: set::Cursor<Entry<K, V>>,
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

    /// Cursor at the next entry in key order, if any.
    pub fn next(&self) -> Option<Self> {
        self.inner.next().map(|inner| Cursor { inner })
    }

    /// Cursor at the previous entry, if any.
    pub fn prev(&self) -> Option<Self> {
        self.inner.prev().map(|inner| Cursor { inner })
    }

    /// The map that results from removing the current entry.
    pub fn remove(&self) -> Map<K, V> {
        Map {
            entries: self.inner.remove(),
        }
    }
}

/// Borrowed iterator over a [`Map`] in ascending key order.
pub struct Iter<'a, K, V> {
    inner: set::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
mod map_serde {
    use super::Map;
    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, SerializeMap, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    impl<K: Serialize, V: Serialize> Serialize for Map<K, V> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    struct MapVisitor<K, V> {
        marker: PhantomData<(K, V)>,
    }

    impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
    where
        K: Deserialize<'de> + Clone + Ord,
        V: Deserialize<'de> + Clone,
    {
        type Value = Map<K, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<M: MapAccess<'de>>(
            self,
            mut access: M,
        ) -> Result<Self::Value, M::Error> {
            let mut out = Map::new();
            while let Some((k, v)) = access.next_entry()? {
                out = out.insert(k, v);
            }
            Ok(out)
        }
    }

    impl<'de, K, V> Deserialize<'de> for Map<K, V>
    where
        K: Deserialize<'de> + Clone + Ord,
        V: Deserialize<'de> + Clone,
    {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            deserializer.deserialize_map(MapVisitor {
                marker: PhantomData,
            })
        }
    }
}
