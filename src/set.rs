//! A persistent ordered set.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::iter::FusedIterator;

use crate::list::List;
use crate::tree::{Insert, Node, Slot, TreeIter};
use crate::Error;

/// An immutable ordered set backed by a 2-3 tree.
///
/// Passing a `Set` around by value is cheap: clones share their internal
/// representation, and every updating operation returns a new set that
/// shares all untouched subtrees with its source.  Both the set before an
/// insert and the set after it remain valid; whichever you stop referencing
/// is cleaned up.  The practical payoff is that sets can be handed between
/// threads without any synchronization at all, because no operation ever
/// mutates shared state.
///
/// # Examples
/// ```
/// use twothree_collections::Set;
///
/// let s: Set<i32> = [7, 10, 5].into_iter().collect();
/// assert!(s.contains(&10));
/// assert_eq!(s.to_list().to_string(), "[5,7,10]");
///
/// // updates leave the original untouched
/// let t = s.remove(&7);
/// assert!(s.contains(&7) && !t.contains(&7));
/// ```
#[derive(Clone)]
pub struct Set<A> {
    root: Option<Node<A>>,
    len: usize,
}

impl<A> Set<A> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Set { root: None, len: 0 }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Tests whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the least element, or `None` if the set is empty.
    pub fn first(&self) -> Option<&A> {
        self.root.as_ref().map(|r| r.min())
    }

    /// Returns the greatest element, or `None` if the set is empty.
    pub fn last(&self) -> Option<&A> {
        self.root.as_ref().map(|r| r.max())
    }

    /// Iterates the set in ascending order.
    pub fn iter(&self) -> Iter<'_, A> {
        Iter {
            stack: self.root.iter().map(|r| (r, 0)).collect(),
            remaining: self.len,
        }
    }

    pub(crate) fn get_by<F>(&self, probe: F) -> Option<&A>
    where
        F: Fn(&A) -> Ordering,
    {
        self.root.as_ref().and_then(|r| r.get_by(probe))
    }

    #[cfg(test)]
    pub(crate) fn root_for_tests(&self) -> Option<&Node<A>> {
        self.root.as_ref()
    }
}

impl<A: Clone> Set<A> {
    pub(crate) fn lower_bound_by<F>(&self, probe: &F) -> Option<Cursor<A>>
    where
        F: Fn(&A) -> Ordering,
    {
        let it = self.root.as_ref()?.lower_bound_by(probe)?;
        Some(self.cursor(it))
    }

    pub(crate) fn find_by<F>(&self, probe: &F) -> Option<Cursor<A>>
    where
        F: Fn(&A) -> Ordering,
    {
        let it = self.root.as_ref()?.find_by(probe)?;
        Some(self.cursor(it))
    }

    pub(crate) fn upper_bound_by<F>(&self, probe: &F) -> Option<Cursor<A>>
    where
        F: Fn(&A) -> Ordering,
    {
        match self.lower_bound_by(probe) {
            Some(cur) => {
                // landed past the pivot: the answer is one step back
                if probe(cur.get()) == Ordering::Greater {
                    cur.prev()
                } else {
                    Some(cur)
                }
            }
            None => self.end(),
        }
    }

    fn cursor(&self, it: TreeIter<A>) -> Cursor<A> {
        Cursor { it, len: self.len }
    }

    /// Cursor at the least element, or `None` if the set is empty.
    pub fn begin(&self) -> Option<Cursor<A>> {
        self.root.as_ref().map(|r| self.cursor(r.begin()))
    }

    /// Cursor at the greatest element, or `None` if the set is empty.
    pub fn end(&self) -> Option<Cursor<A>> {
        self.root.as_ref().map(|r| self.cursor(r.end()))
    }

    /// The set's elements in ascending order.
    pub fn to_list(&self) -> List<A> {
        let elems: Vec<&A> = self.iter().collect();
        let mut out = List::new();
        for x in elems.into_iter().rev() {
            out = out.cons(x.clone());
        }
        out
    }

    /// Folds the elements in ascending order.
    pub fn foldl<B, F: FnMut(B, &A) -> B>(&self, f: F, init: B) -> B {
        self.iter().fold(init, f)
    }

    /// Folds a non-empty set with no initial value.
    ///
    /// Fails with [`Error::EmptyContainer`] on an empty set.
    pub fn foldl1<F: FnMut(A, &A) -> A>(&self, mut f: F) -> Result<A, Error> {
        let mut iter = self.iter();
        match iter.next() {
            Some(first) => Ok(iter.fold(first.clone(), |b, a| f(b, a))),
            None => Err(Error::EmptyContainer),
        }
    }
}

impl<A: Clone + Ord> Set<A> {
    /// Creates a set holding one element.
    pub fn singleton(x: A) -> Self {
        Set::new().insert(x)
    }

    /// Returns a new set with `x` added.
    ///
    /// An element equal to `x` is replaced, so inserting a duplicate leaves
    /// the length unchanged.
    pub fn insert(&self, x: A) -> Self {
        match &self.root {
            None => Set {
                root: Some(Node::Leaf1(x)),
                len: 1,
            },
            Some(r) => match r.insert(x) {
                Insert::Done(n, replaced) => Set {
                    root: Some(n),
                    len: if replaced { self.len } else { self.len + 1 },
                },
                Insert::Split(l, s, rt) => Set {
                    root: Some(Node::Node2(l, s, rt)),
                    len: self.len + 1,
                },
            },
        }
    }

    /// Returns a new set with the element equal to `x` removed, or an
    /// unchanged set when there is no such element.
    pub fn remove(&self, x: &A) -> Self {
        match self.find(x) {
            Some(cur) => cur.remove(),
            None => self.clone(),
        }
    }

    /// Tests whether an element equal to `x` is present.
    pub fn contains(&self, x: &A) -> bool {
        self.get(x).is_some()
    }

    /// Returns the stored element equal to `x`, if any.
    pub fn get(&self, x: &A) -> Option<&A> {
        self.get_by(|a| a.cmp(x))
    }

    /// Cursor at the element equal to `x`, if present.
    pub fn find(&self, x: &A) -> Option<Cursor<A>> {
        self.find_by(&|a: &A| a.cmp(x))
    }

    /// Cursor at the smallest element `>=` the pivot, or `None` if every
    /// element is smaller.
    pub fn lower_bound(&self, pivot: &A) -> Option<Cursor<A>> {
        self.lower_bound_by(&|a: &A| a.cmp(pivot))
    }

    /// Cursor at the largest element `<=` the pivot, or `None` if every
    /// element is larger.
    ///
    /// Note that this is not the C++ STL's `upper_bound` convention; it is
    /// the mirror image of [`lower_bound`](Set::lower_bound).
    pub fn upper_bound(&self, pivot: &A) -> Option<Cursor<A>> {
        self.upper_bound_by(&|a: &A| a.cmp(pivot))
    }

    /// Set union.  Elements of `other` replace equal elements of `self`.
    pub fn union(&self, other: &Self) -> Self {
        other.iter().fold(self.clone(), |s, x| s.insert(x.clone()))
    }

    /// Set difference: `self` with every element of `other` removed.
    pub fn difference(&self, other: &Self) -> Self {
        other.iter().fold(self.clone(), |s, x| s.remove(x))
    }

    /// Set intersection.
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter()
            .filter(|&x| other.contains(x))
            .fold(Set::new(), |s, x| s.insert(x.clone()))
    }

    /// Maps `f` over the elements, collecting the results into a new set.
    pub fn map<B, F>(&self, mut f: F) -> Set<B>
    where
        B: Clone + Ord,
        F: FnMut(&A) -> B,
    {
        self.iter().fold(Set::new(), |s, x| s.insert(f(x)))
    }
}

impl<A> Default for Set<A> {
    fn default() -> Self {
        Set::new()
    }
}

impl<A: Clone + PartialEq> PartialEq for Set<A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<A: Clone + Eq> Eq for Set<A> {}

impl<A: Clone + PartialOrd> PartialOrd for Set<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<A: Clone + Ord> Ord for Set<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<A: Debug> Debug for Set<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<A: Display> Display for Set<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            Display::fmt(x, f)?;
        }
        f.write_str("}")
    }
}

impl<A: Clone + Ord> FromIterator<A> for Set<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        iter.into_iter().fold(Set::new(), |s, x| s.insert(x))
    }
}

impl<A: Clone + Ord> Extend<A> for Set<A> {
    fn extend<I: IntoIterator<Item = A>>(&mut self, iter: I) {
        for x in iter {
            *self = self.insert(x);
        }
    }
}

impl<A: Clone + Ord> std::ops::Add for Set<A> {
    type Output = Set<A>;

    /// Monoidal append = set union.
    fn add(self, other: Self) -> Self {
        self.union(&other)
    }
}

/// A persistent cursor into a [`Set`].
///
/// A cursor always points at an element ("an iterator that points nowhere"
/// cannot be constructed).  Navigation returns new cursors; [`remove`]
/// returns the set that results from deleting the current element.  A
/// cursor retains the snapshot it was created from, so it survives the
/// originating set being dropped.
///
/// [`remove`]: Cursor::remove
#[derive(Clone)]
pub struct Cursor<A> {
    it: TreeIter<A>,
    len: usize,
}

impl<A: Clone> Cursor<A> {
    /// The element the cursor points at.
    pub fn get(&self) -> &A {
        self.it.get()
    }

    /// Cursor at the next element in ascending order, if any.
    pub fn next(&self) -> Option<Self> {
        Some(Cursor {
            it: self.it.next()?,
            len: self.len,
        })
    }

    /// Cursor at the previous element, if any.
    pub fn prev(&self) -> Option<Self> {
        Some(Cursor {
            it: self.it.prev()?,
            len: self.len,
        })
    }

    /// The set that results from removing the current element.
    pub fn remove(&self) -> Set<A> {
        Set {
            root: self.it.remove(),
            len: self.len - 1,
        }
    }
}

/// Borrowed in-order iterator over a [`Set`].
pub struct Iter<'a, A> {
    // (node, next slot to visit) frames, deepest last
    stack: Vec<(&'a Node<A>, usize)>,
    remaining: usize,
}

impl<'a, A> Iterator for Iter<'a, A> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, ix) = self.stack.pop()?;
            if ix >= node.slot_count() {
                continue;
            }
            self.stack.push((node, ix + 1));
            match node.slot(ix) {
                Slot::Kid(c) => self.stack.push((c.as_ref(), 0)),
                Slot::Elem(a) => {
                    self.remaining -= 1;
                    return Some(a);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<A> ExactSizeIterator for Iter<'_, A> {}
impl<A> FusedIterator for Iter<'_, A> {}

impl<'a, A> IntoIterator for &'a Set<A> {
    type Item = &'a A;
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
mod set_serde {
    use super::Set;
    use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeSeq, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    impl<A: Serialize> Serialize for Set<A> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for x in self.iter() {
                seq.serialize_element(x)?;
            }
            seq.end()
        }
    }

    struct SetVisitor<A> {
        marker: PhantomData<A>,
    }

    impl<'de, A> Visitor<'de> for SetVisitor<A>
    where
        A: Deserialize<'de> + Clone + Ord,
    {
        type Value = Set<A>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a sequence of set elements")
        }

        fn visit_seq<S: SeqAccess<'de>>(
            self,
            mut seq: S,
        ) -> Result<Self::Value, S::Error> {
            let mut out = Set::new();
            while let Some(x) = seq.next_element()? {
                out = out.insert(x);
            }
            Ok(out)
        }
    }

    impl<'de, A> Deserialize<'de> for Set<A>
    where
        A: Deserialize<'de> + Clone + Ord,
    {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            deserializer.deserialize_seq(SetVisitor {
                marker: PhantomData,
            })
        }
    }
}
