//! A persistent one-to-one correspondence.

use crate::map::{self, Map};

/// An efficiently searched one-to-one correspondence between values of two
/// types, stored as a pair of maps that are always updated together.
///
/// # Examples
/// ```
/// use twothree_collections::Bijection;
///
/// let b = Bijection::new().associate(1, "one").associate(2, "two");
/// assert_eq!(b.forward_association(&1), Some(&"one"));
/// assert_eq!(b.back_association(&"two"), Some(&2));
///
/// let b = b.back_unassociate(&"one");
/// assert_eq!(b.forward_association(&1), None);
/// ```
#[derive(Clone)]
pub struct Bijection<L, R> {
    forward: Map<L, R>,
    back: Map<R, L>,
}

impl<L: Clone + Ord, R: Clone + Ord> Bijection<L, R> {
    /// Creates an empty correspondence.
    pub fn new() -> Self {
        Bijection {
            forward: Map::new(),
            back: Map::new(),
        }
    }

    /// Returns the number of associations.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Tests whether the correspondence is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Adds a two-way association between `l` and `r`.
    pub fn associate(&self, l: L, r: R) -> Self {
        Bijection {
            forward: self.forward.insert(l.clone(), r.clone()),
            back: self.back.insert(r, l),
        }
    }

    /// Returns what `l` is associated with.
    pub fn forward_association(&self, l: &L) -> Option<&R> {
        self.forward.get(l)
    }

    /// Returns what `r` is associated with.
    pub fn back_association(&self, r: &R) -> Option<&L> {
        self.back.get(r)
    }

    /// Removes the two-way association between `l` and whatever it was
    /// associated with; no-op if `l` is unassociated.
    pub fn forward_unassociate(&self, l: &L) -> Self {
        match self.forward_association(l) {
            Some(r) => self.unassociate(l, &r.clone()),
            None => self.clone(),
        }
    }

    /// Removes the two-way association between `r` and whatever it was
    /// associated with; no-op if `r` is unassociated.
    pub fn back_unassociate(&self, r: &R) -> Self {
        match self.back_association(r) {
            Some(l) => self.unassociate(&l.clone(), r),
            None => self.clone(),
        }
    }

    /// Cursor at the association with the least left value, if any.
    pub fn begin(&self) -> Option<Cursor<L, R>> {
        self.forward.begin().map(|inner| Cursor { inner })
    }

    /// Cursor at the association with the greatest left value, if any.
    pub fn end(&self) -> Option<Cursor<L, R>> {
        self.forward.end().map(|inner| Cursor { inner })
    }

    fn unassociate(&self, l: &L, r: &R) -> Self {
        Bijection {
            forward: self.forward.remove(l),
            back: self.back.remove(r),
        }
    }
}

impl<L: Clone + Ord, R: Clone + Ord> Default for Bijection<L, R> {
    fn default() -> Self {
        Bijection::new()
    }
}

/// A persistent cursor over a [`Bijection`], ordered by left value.
#[derive(Clone)]
pub struct Cursor<L, R> {
    inner: map::Cursor<L, R>,
}

impl<L: Clone, R: Clone> Cursor<L, R> {
    /// The left value of the current association.
    pub fn left(&self) -> &L {
        self.inner.key()
    }

    /// The right value of the current association.
    pub fn right(&self) -> &R {
        self.inner.value()
    }

    /// Cursor at the next association in left order, if any.
    pub fn next(&self) -> Option<Self> {
        self.inner.next().map(|inner| Cursor { inner })
    }

    /// Cursor at the previous association, if any.
    pub fn prev(&self) -> Option<Self> {
        self.inner.prev().map(|inner| Cursor { inner })
    }
}
