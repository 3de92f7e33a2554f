//! The 2-3 tree node engine.
//!
//! Everything ordered in this crate sits on this module.  A tree is an
//! `Option<Node<A>>` held by a wrapper; the engine itself only knows about
//! nodes.  All operations are pure: they take nodes by reference and return
//! freshly built nodes whose untouched children are shared with the input
//! through `Arc`.
//!
//! Navigation, removal, and root reconstruction go through [`TreeIter`], a
//! persistent stack of `(node, slot)` frames recording the path from the
//! root to the current element.  Slots are numbered left to right; children
//! sit on even slots and elements on odd slots, except in leaves where the
//! one or two elements occupy slots 0 and 1.

use std::cmp::Ordering::{self, *};
use std::sync::Arc;

use crate::list::List;

pub(crate) type Child<A> = Arc<Node<A>>;

#[derive(Clone)]
pub(crate) enum Node<A> {
    Leaf1(A),
    Leaf2(A, A),
    Node2(Child<A>, A, Child<A>),
    Node3(Child<A>, A, Child<A>, A, Child<A>),
}

use Node::*;

/// The result of inserting into a node: either a new node of the same
/// level (with a flag for "replaced an equal element"), or the promoted
/// 2-node when the insert overflowed and the node had to split.
pub(crate) enum Insert<A> {
    Done(Node<A>, bool),
    Split(Child<A>, A, Child<A>),
}

/// A slot of a node, for uniform left-to-right walks.
pub(crate) enum Slot<'a, A> {
    Elem(&'a A),
    Kid(&'a Child<A>),
}

impl<A> Node<A> {
    pub(crate) fn slot_count(&self) -> usize {
        match self {
            Leaf1(_) => 1,
            Leaf2(..) => 2,
            Node2(..) => 3,
            Node3(..) => 5,
        }
    }

    pub(crate) fn slot(&self, ix: usize) -> Slot<'_, A> {
        match (self, ix) {
            (Leaf1(a), 0) => Slot::Elem(a),
            (Leaf2(a, _), 0) => Slot::Elem(a),
            (Leaf2(_, b), 1) => Slot::Elem(b),
            (Node2(p, ..), 0) => Slot::Kid(p),
            (Node2(_, a, _), 1) => Slot::Elem(a),
            (Node2(.., q), 2) => Slot::Kid(q),
            (Node3(p, ..), 0) => Slot::Kid(p),
            (Node3(_, a, ..), 1) => Slot::Elem(a),
            (Node3(_, _, q, ..), 2) => Slot::Kid(q),
            (Node3(.., b, _), 3) => Slot::Elem(b),
            (Node3(.., r), 4) => Slot::Kid(r),
            _ => unreachable!("slot index out of range"),
        }
    }

    fn is_two_node(&self) -> bool {
        matches!(self, Leaf1(_) | Node2(..))
    }

    /// The least element of the subtree.
    pub(crate) fn min(&self) -> &A {
        let mut node = self;
        loop {
            match node {
                Leaf1(a) | Leaf2(a, _) => return a,
                Node2(p, ..) | Node3(p, ..) => node = p.as_ref(),
            }
        }
    }

    /// The greatest element of the subtree.
    pub(crate) fn max(&self) -> &A {
        let mut node = self;
        loop {
            match node {
                Leaf1(a) | Leaf2(_, a) => return a,
                Node2(.., q) => node = q.as_ref(),
                Node3(.., r) => node = r.as_ref(),
            }
        }
    }

    /// Borrowed point lookup.  `probe` reports how an element compares to
    /// the sought value: `Less` sends the walk right, `Greater` left.
    pub(crate) fn get_by<F>(&self, probe: F) -> Option<&A>
    where
        F: Fn(&A) -> Ordering,
    {
        let mut node = self;
        loop {
            match node {
                Leaf1(a) => return (probe(a) == Equal).then_some(a),
                Leaf2(a, b) => {
                    return match probe(a) {
                        Equal => Some(a),
                        Greater => None,
                        Less => (probe(b) == Equal).then_some(b),
                    }
                }
                Node2(p, a, q) => match probe(a) {
                    Equal => return Some(a),
                    Greater => node = p.as_ref(),
                    Less => node = q.as_ref(),
                },
                Node3(p, a, q, b, r) => match probe(a) {
                    Equal => return Some(a),
                    Greater => node = p.as_ref(),
                    Less => match probe(b) {
                        Equal => return Some(b),
                        Greater => node = q.as_ref(),
                        Less => node = r.as_ref(),
                    },
                },
            }
        }
    }

    // Replace the child at slot `ix` with `child`, keeping everything else.
    fn with_child(&self, ix: usize, child: Node<A>) -> Node<A>
    where
        A: Clone,
    {
        let child = Arc::new(child);
        match (self, ix) {
            (Node2(_, a, q), 0) => Node2(child, a.clone(), q.clone()),
            (Node2(p, a, _), 2) => Node2(p.clone(), a.clone(), child),
            (Node3(_, a, q, b, r), 0) => {
                Node3(child, a.clone(), q.clone(), b.clone(), r.clone())
            }
            (Node3(p, a, _, b, r), 2) => {
                Node3(p.clone(), a.clone(), child, b.clone(), r.clone())
            }
            (Node3(p, a, q, b, _), 4) => {
                Node3(p.clone(), a.clone(), q.clone(), b.clone(), child)
            }
            _ => unreachable!("unwind through a non-child slot"),
        }
    }
}

impl<A: Clone + Ord> Node<A> {
    /// 2-3 tree insertion.  Equal elements are replaced in place; otherwise
    /// the new element lands in a leaf and overflows propagate up as
    /// [`Insert::Split`] until some ancestor absorbs them.
    pub(crate) fn insert(&self, x: A) -> Insert<A> {
        use Insert::*;

        match self {
            Leaf1(a) => match x.cmp(a) {
                Equal => Done(Leaf1(x), true),
                Less => Done(Leaf2(x, a.clone()), false),
                Greater => Done(Leaf2(a.clone(), x), false),
            },

            Leaf2(a, b) => {
                if x == *a {
                    Done(Leaf2(x, b.clone()), true)
                } else if x == *b {
                    Done(Leaf2(a.clone(), x), true)
                } else {
                    // three elements: keep the middle, split the outer two
                    let (s, m, l) = if x < *a {
                        (x, a.clone(), b.clone())
                    } else if x < *b {
                        (a.clone(), x, b.clone())
                    } else {
                        (a.clone(), b.clone(), x)
                    };
                    Split(Arc::new(Leaf1(s)), m, Arc::new(Leaf1(l)))
                }
            }

            Node2(p, a, q) => match x.cmp(a) {
                Equal => Done(Node2(p.clone(), x, q.clone()), true),
                Less => match p.insert(x) {
                    Done(n, replaced) => Done(
                        Node2(Arc::new(n), a.clone(), q.clone()),
                        replaced,
                    ),
                    Split(l, s, r) => {
                        Done(Node3(l, s, r, a.clone(), q.clone()), false)
                    }
                },
                Greater => match q.insert(x) {
                    Done(n, replaced) => Done(
                        Node2(p.clone(), a.clone(), Arc::new(n)),
                        replaced,
                    ),
                    Split(l, s, r) => {
                        Done(Node3(p.clone(), a.clone(), l, s, r), false)
                    }
                },
            },

            Node3(p, a, q, b, r) => {
                if x == *a {
                    Done(
                        Node3(p.clone(), x, q.clone(), b.clone(), r.clone()),
                        true,
                    )
                } else if x == *b {
                    Done(
                        Node3(p.clone(), a.clone(), q.clone(), x, r.clone()),
                        true,
                    )
                } else if x < *a {
                    match p.insert(x) {
                        Done(n, replaced) => Done(
                            Node3(
                                Arc::new(n),
                                a.clone(),
                                q.clone(),
                                b.clone(),
                                r.clone(),
                            ),
                            replaced,
                        ),
                        Split(l, s, rt) => Split(
                            Arc::new(Node2(l, s, rt)),
                            a.clone(),
                            Arc::new(Node2(q.clone(), b.clone(), r.clone())),
                        ),
                    }
                } else if x < *b {
                    match q.insert(x) {
                        Done(n, replaced) => Done(
                            Node3(
                                p.clone(),
                                a.clone(),
                                Arc::new(n),
                                b.clone(),
                                r.clone(),
                            ),
                            replaced,
                        ),
                        Split(l, s, rt) => Split(
                            Arc::new(Node2(p.clone(), a.clone(), l)),
                            s,
                            Arc::new(Node2(rt, b.clone(), r.clone())),
                        ),
                    }
                } else {
                    match r.insert(x) {
                        Done(n, replaced) => Done(
                            Node3(
                                p.clone(),
                                a.clone(),
                                q.clone(),
                                b.clone(),
                                Arc::new(n),
                            ),
                            replaced,
                        ),
                        Split(l, s, rt) => Split(
                            Arc::new(Node2(p.clone(), a.clone(), q.clone())),
                            b.clone(),
                            Arc::new(Node2(l, s, rt)),
                        ),
                    }
                }
            }
        }
    }
}

impl<A: Clone> Node<A> {
    /// Iterator at the least element.
    pub(crate) fn begin(&self) -> TreeIter<A> {
        TreeIter {
            stack: descend(List::new(), self, 1, None),
        }
    }

    /// Iterator at the greatest element.
    pub(crate) fn end(&self) -> TreeIter<A> {
        TreeIter {
            stack: descend(List::new(), self, -1, None),
        }
    }

    /// Iterator at the smallest element `>=` the probed value, if any.
    ///
    /// `probe` reports how an element compares to the sought value.
    pub(crate) fn lower_bound_by<F>(&self, probe: &F) -> Option<TreeIter<A>>
    where
        F: Fn(&A) -> Ordering,
    {
        lower_bound(List::new(), self, probe).map(|stack| TreeIter { stack })
    }

    /// Iterator at the element comparing `Equal` under `probe`, if any.
    pub(crate) fn find_by<F>(&self, probe: &F) -> Option<TreeIter<A>>
    where
        F: Fn(&A) -> Ordering,
    {
        let it = self.lower_bound_by(probe)?;
        (probe(it.get()) == Equal).then_some(it)
    }
}

#[derive(Clone)]
pub(crate) struct Pos<A> {
    node: Node<A>,
    ix: usize,
}

/// A path-recording iterator: a nonempty stack of `(node, slot)` frames
/// from the root down to the current element.
///
/// The iterator owns its frames, and the frames hold the `Arc`s keeping the
/// snapshot alive, so an iterator stays valid after the container it came
/// from is dropped.  Navigation returns fresh iterators sharing the
/// unchanged part of the path.
#[derive(Clone)]
pub(crate) struct TreeIter<A> {
    stack: List<Pos<A>>,
}

// Walk into `node` and push frames until a terminal slot is reached.
// `at` picks the slot to enter; `None` means the extreme slot in the
// direction of travel (leftmost for dir > 0, rightmost for dir < 0).
fn descend<A: Clone>(
    stack: List<Pos<A>>,
    node: &Node<A>,
    dir: i32,
    at: Option<usize>,
) -> List<Pos<A>> {
    let push = |ix: usize| {
        stack.cons(Pos {
            node: node.clone(),
            ix,
        })
    };

    match node {
        Leaf1(_) => push(0),
        Leaf2(..) => push(at.unwrap_or(if dir < 0 { 1 } else { 0 })),
        Node2(p, _, q) => {
            let ix = at.unwrap_or(if dir < 0 { 2 } else { 0 });
            match ix {
                0 => descend(push(0), p, dir, None),
                2 => descend(push(2), q, dir, None),
                _ => push(ix),
            }
        }
        Node3(p, _, q, _, r) => {
            let ix = at.unwrap_or(if dir < 0 { 4 } else { 0 });
            match ix {
                0 => descend(push(0), p, dir, None),
                2 => descend(push(2), q, dir, None),
                4 => descend(push(4), r, dir, None),
                _ => push(ix),
            }
        }
    }
}

fn lower_bound<A: Clone, F>(
    stack: List<Pos<A>>,
    node: &Node<A>,
    probe: &F,
) -> Option<List<Pos<A>>>
where
    F: Fn(&A) -> Ordering,
{
    let push = |ix: usize| {
        stack.cons(Pos {
            node: node.clone(),
            ix,
        })
    };

    match node {
        Leaf1(a) => (probe(a) != Less).then(|| push(0)),
        Leaf2(a, b) => {
            if probe(a) != Less {
                Some(push(0))
            } else if probe(b) != Less {
                Some(push(1))
            } else {
                None
            }
        }
        Node2(p, a, q) => {
            if probe(a) != Less {
                // the bound is in p, or failing that, `a` itself
                lower_bound(push(0), p, probe).or_else(|| Some(push(1)))
            } else {
                lower_bound(push(2), q, probe)
            }
        }
        Node3(p, a, q, b, r) => {
            if probe(a) != Less {
                lower_bound(push(0), p, probe).or_else(|| Some(push(1)))
            } else if probe(b) != Less {
                lower_bound(push(2), q, probe).or_else(|| Some(push(3)))
            } else {
                lower_bound(push(4), r, probe)
            }
        }
    }
}

impl<A: Clone> TreeIter<A> {
    /// The element the top frame designates.
    pub(crate) fn get(&self) -> &A {
        match self.stack.head() {
            Some(top) => match (&top.node, top.ix) {
                (Leaf1(a), _) => a,
                (Leaf2(a, _), 0) => a,
                (Leaf2(_, b), _) => b,
                (Node2(_, a, _), _) => a,
                (Node3(_, a, ..), 1) => a,
                (Node3(.., b, _), _) => b,
            },
            None => unreachable!("iterator with an empty path"),
        }
    }

    pub(crate) fn next(&self) -> Option<Self> {
        self.move_by(1)
    }

    pub(crate) fn prev(&self) -> Option<Self> {
        self.move_by(-1)
    }

    fn move_by(&self, dir: i32) -> Option<Self> {
        let (top, rest) = self.stack.uncons()?;
        let next_ix = top.ix as i32 + dir;
        if next_ix >= 0 && (next_ix as usize) < top.node.slot_count() {
            Some(TreeIter {
                stack: descend(rest, &top.node, dir, Some(next_ix as usize)),
            })
        } else if rest.is_empty() {
            None
        } else {
            TreeIter { stack: rest }.move_by(dir)
        }
    }

    /// Rebuild the root of the tree this iterator refers to, installing the
    /// top frame's node into every ancestor along the recorded path.
    ///
    /// This is how a pure update to a deep node propagates out: replace the
    /// top frame, then unwind.
    pub(crate) fn unwind(&self) -> Node<A> {
        match self.stack.uncons() {
            None => unreachable!("unwind of an empty path"),
            Some((top, mut rest)) => {
                let mut node = top.node.clone();
                while let Some((parent, tail)) = rest.uncons() {
                    node = parent.node.with_child(parent.ix, node);
                    rest = tail;
                }
                node
            }
        }
    }

    /// Remove the current element, returning the new root, or `None` when
    /// the last element went away.
    pub(crate) fn remove(&self) -> Option<Node<A>> {
        let (top, rest) = self.stack.uncons()?;
        match &top.node {
            // Deleting at an internal node: overwrite the separator with its
            // in-order successor (or predecessor), then delete that element
            // from its leaf.
            Node3(p, a, q, b, r) => {
                if top.ix == 1 {
                    let succ = self.succ_value();
                    let it = TreeIter {
                        stack: rest.cons(Pos {
                            node: Node3(
                                p.clone(),
                                succ,
                                q.clone(),
                                b.clone(),
                                r.clone(),
                            ),
                            ix: 1,
                        }),
                    };
                    it.succ().remove()
                } else {
                    let pred = self.pred_value();
                    let it = TreeIter {
                        stack: rest.cons(Pos {
                            node: Node3(
                                p.clone(),
                                a.clone(),
                                q.clone(),
                                pred,
                                r.clone(),
                            ),
                            ix: 3,
                        }),
                    };
                    it.pred().remove()
                }
            }

            Node2(p, _, q) => {
                let succ = self.succ_value();
                let it = TreeIter {
                    stack: rest.cons(Pos {
                        node: Node2(p.clone(), succ, q.clone()),
                        ix: 1,
                    }),
                };
                it.succ().remove()
            }

            Leaf2(a, b) => {
                let keep = if top.ix == 0 { b } else { a };
                let it = TreeIter {
                    stack: rest.cons(Pos {
                        node: Leaf1(keep.clone()),
                        ix: 0,
                    }),
                };
                Some(it.unwind())
            }

            // A hole opens where the leaf stood; bubble it up.
            Leaf1(_) => bubble(rest, None),
        }
    }

    fn succ(&self) -> Self {
        match self.next() {
            Some(it) => it,
            None => unreachable!("separator without a successor"),
        }
    }

    fn pred(&self) -> Self {
        match self.prev() {
            Some(it) => it,
            None => unreachable!("separator without a predecessor"),
        }
    }

    fn succ_value(&self) -> A {
        self.succ().get().clone()
    }

    fn pred_value(&self) -> A {
        self.pred().get().clone()
    }
}

// The deletion rebalance.  `hole` is the subtree standing where the removed
// child used to be; it is one level shorter than its siblings (`None` when
// the removed child was a leaf).  At each parent the hole is repaired by
// merging with an adjacent 2-node sibling (which may push the hole one
// level up) or by borrowing from an adjacent 3-node sibling (which always
// terminates).
fn bubble<A: Clone>(
    stack: List<Pos<A>>,
    hole: Option<Node<A>>,
) -> Option<Node<A>> {
    let (top, rest) = match stack.uncons() {
        // The hole reached the root: whatever is left is the new tree.
        None => return hole,
        Some(x) => x,
    };

    match &top.node {
        Node2(p, a, q) => {
            let (sibling, hole_on_left) =
                if top.ix == 0 { (q, true) } else { (p, false) };
            if sibling.is_two_node() {
                // merging consumes the separator; the parent itself becomes
                // the hole one level up
                let merged = if hole_on_left {
                    merge_left(hole, a, sibling)
                } else {
                    merge_right(sibling, a, hole)
                };
                bubble(rest, Some(merged))
            } else {
                let (l, sep, r) = if hole_on_left {
                    split_left(hole, a, sibling)
                } else {
                    split_right(sibling, a, hole)
                };
                finish(rest, Node2(Arc::new(l), sep, Arc::new(r)))
            }
        }

        Node3(p, a, q, b, r) => {
            let parent = match top.ix {
                0 => {
                    if q.is_two_node() {
                        Node2(
                            Arc::new(merge_left(hole, a, q)),
                            b.clone(),
                            r.clone(),
                        )
                    } else {
                        let (l, sep, rt) = split_left(hole, a, q);
                        Node3(
                            Arc::new(l),
                            sep,
                            Arc::new(rt),
                            b.clone(),
                            r.clone(),
                        )
                    }
                }
                2 => {
                    if p.is_two_node() {
                        Node2(
                            Arc::new(merge_right(p, a, hole)),
                            b.clone(),
                            r.clone(),
                        )
                    } else {
                        let (l, sep, rt) = split_right(p, a, hole);
                        Node3(
                            Arc::new(l),
                            sep,
                            Arc::new(rt),
                            b.clone(),
                            r.clone(),
                        )
                    }
                }
                4 => {
                    if q.is_two_node() {
                        Node2(
                            p.clone(),
                            a.clone(),
                            Arc::new(merge_right(q, b, hole)),
                        )
                    } else {
                        let (l, sep, rt) = split_right(q, b, hole);
                        Node3(
                            p.clone(),
                            a.clone(),
                            Arc::new(l),
                            sep,
                            Arc::new(rt),
                        )
                    }
                }
                _ => unreachable!("bubble at a separator slot"),
            };
            finish(rest, parent)
        }

        Leaf1(_) | Leaf2(..) => unreachable!("bubble with a leaf parent"),
    }
}

// Install the repaired parent in place and rebuild the root above it.
fn finish<A: Clone>(rest: List<Pos<A>>, parent: Node<A>) -> Option<Node<A>> {
    Some(
        TreeIter {
            stack: rest.cons(Pos {
                node: parent,
                ix: 0,
            }),
        }
        .unwind(),
    )
}

// hole + sep + sibling -> one full node (hole on the left)
fn merge_left<A: Clone>(
    hole: Option<Node<A>>,
    sep: &A,
    sibling: &Node<A>,
) -> Node<A> {
    match (hole, sibling) {
        (None, Leaf1(x)) => Leaf2(sep.clone(), x.clone()),
        (Some(h), Node2(p, a, q)) => {
            Node3(Arc::new(h), sep.clone(), p.clone(), a.clone(), q.clone())
        }
        _ => unreachable!("hole level does not match its sibling"),
    }
}

// sibling + sep + hole -> one full node (hole on the right)
fn merge_right<A: Clone>(
    sibling: &Node<A>,
    sep: &A,
    hole: Option<Node<A>>,
) -> Node<A> {
    match (hole, sibling) {
        (None, Leaf1(x)) => Leaf2(x.clone(), sep.clone()),
        (Some(h), Node2(p, a, q)) => {
            Node3(p.clone(), a.clone(), q.clone(), sep.clone(), Arc::new(h))
        }
        _ => unreachable!("hole level does not match its sibling"),
    }
}

// Redistribute from a 3-node sibling on the right: the hole and separator
// make one node, the sibling splits, and a fresh separator comes back.
fn split_left<A: Clone>(
    hole: Option<Node<A>>,
    sep: &A,
    sibling: &Node<A>,
) -> (Node<A>, A, Node<A>) {
    match (hole, sibling) {
        (None, Leaf2(a, b)) => {
            (Leaf1(sep.clone()), a.clone(), Leaf1(b.clone()))
        }
        (Some(h), Node3(p, a, q, b, r)) => (
            Node2(Arc::new(h), sep.clone(), p.clone()),
            a.clone(),
            Node2(q.clone(), b.clone(), r.clone()),
        ),
        _ => unreachable!("hole level does not match its sibling"),
    }
}

// Mirror image: the 3-node sibling is on the left of the hole.
fn split_right<A: Clone>(
    sibling: &Node<A>,
    sep: &A,
    hole: Option<Node<A>>,
) -> (Node<A>, A, Node<A>) {
    match (hole, sibling) {
        (None, Leaf2(a, b)) => {
            (Leaf1(a.clone()), b.clone(), Leaf1(sep.clone()))
        }
        (Some(h), Node3(p, a, q, b, r)) => (
            Node2(p.clone(), a.clone(), q.clone()),
            b.clone(),
            Node2(r.clone(), sep.clone(), Arc::new(h)),
        ),
        _ => unreachable!("hole level does not match its sibling"),
    }
}

// Test-only structural checker: verifies the ordering invariant and the
// uniform leaf depth, returning (element count, height).
#[cfg(test)]
pub(crate) fn chk<A: Clone + Ord>(node: &Node<A>) -> (usize, usize) {
    fn go<'a, A: Ord>(
        node: &'a Node<A>,
        lo: Option<&'a A>,
        hi: Option<&'a A>,
    ) -> (usize, usize) {
        let in_range = |x: &A| {
            assert!(lo.iter().all(|l| *l < x), "out of order");
            assert!(hi.iter().all(|h| x < *h), "out of order");
        };
        match node {
            Leaf1(a) => {
                in_range(a);
                (1, 1)
            }
            Leaf2(a, b) => {
                assert!(a < b);
                in_range(a);
                in_range(b);
                (2, 1)
            }
            Node2(p, a, q) => {
                in_range(a);
                let (np, hp) = go(p, lo, Some(a));
                let (nq, hq) = go(q, Some(a), hi);
                assert_eq!(hp, hq, "uneven leaf depth");
                (np + nq + 1, hp + 1)
            }
            Node3(p, a, q, b, r) => {
                assert!(a < b);
                in_range(a);
                in_range(b);
                let (np, hp) = go(p, lo, Some(a));
                let (nq, hq) = go(q, Some(a), Some(b));
                let (nr, hr) = go(r, Some(b), hi);
                assert_eq!(hp, hq, "uneven leaf depth");
                assert_eq!(hq, hr, "uneven leaf depth");
                (np + nq + nr + 2, hp + 1)
            }
        }
    }

    go(node, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_for(x: i32) -> impl Fn(&i32) -> Ordering {
        move |a| a.cmp(&x)
    }

    fn build(xs: &[i32]) -> Node<i32> {
        let mut root = Leaf1(xs[0]);
        for &x in &xs[1..] {
            root = match root.insert(x) {
                Insert::Done(n, _) => n,
                Insert::Split(l, s, r) => Node2(l, s, r),
            };
            chk(&root);
        }
        root
    }

    #[test]
    fn leaf_overflow_splits() {
        let root = build(&[2, 1, 3]);
        match &root {
            Node2(p, a, q) => {
                assert!(matches!(&**p, Leaf1(1)));
                assert_eq!(*a, 2);
                assert!(matches!(&**q, Leaf1(3)));
            }
            _ => panic!("expected a split root"),
        }
    }

    #[test]
    fn replace_keeps_shape() {
        let root = build(&[2, 1, 3]);
        match root.insert(2) {
            Insert::Done(n, replaced) => {
                assert!(replaced);
                assert_eq!(chk(&n), chk(&root));
            }
            _ => panic!("replace must not split"),
        }
    }

    #[test]
    fn walks_in_order() {
        let root = build(&[5, 2, 8, 1, 9, 3, 7, 4, 6, 0]);
        let mut got = Vec::new();
        let mut it = Some(root.begin());
        while let Some(i) = it {
            got.push(*i.get());
            it = i.next();
        }
        assert_eq!(got, (0..10).collect::<Vec<_>>());

        let mut back = Vec::new();
        let mut it = Some(root.end());
        while let Some(i) = it {
            back.push(*i.get());
            it = i.prev();
        }
        assert_eq!(back, (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn bounds() {
        let root = build(&[10, 20, 30, 40]);
        let it = root.lower_bound_by(&probe_for(25));
        assert_eq!(it.map(|i| *i.get()), Some(30));
        assert!(root.lower_bound_by(&probe_for(41)).is_none());
        let it = root.lower_bound_by(&probe_for(-5));
        assert_eq!(it.map(|i| *i.get()), Some(10));
    }

    #[test]
    fn find_discards_mismatches() {
        let root = build(&[10, 20, 30]);
        assert_eq!(root.find_by(&probe_for(20)).map(|i| *i.get()), Some(20));
        assert!(root.find_by(&probe_for(25)).is_none());
    }

    #[test]
    fn remove_every_element_every_order() {
        // remove each element from every position of a tree big enough to
        // hit all four bubble cases
        let xs: Vec<i32> = (0..30).collect();
        for victim in 0..30 {
            let root = build(&xs);
            let it = match root.find_by(&probe_for(victim)) {
                Some(it) => it,
                None => panic!("missing element"),
            };
            match it.remove() {
                Some(n) => {
                    let (count, _) = chk(&n);
                    assert_eq!(count, 29);
                    assert!(n.get_by(probe_for(victim)).is_none());
                }
                None => panic!("tree should not be empty"),
            }
        }
    }

    #[test]
    fn remove_to_empty() {
        let mut root = Some(build(&[1, 2, 3]));
        for _ in 0..3 {
            let r = root.take().expect("tree vanished early");
            root = r.begin().remove();
            if let Some(n) = &root {
                chk(n);
            }
        }
        assert!(root.is_none());
    }

    #[test]
    fn unwind_reinstalls_modified_leaf() {
        let root = build(&[1, 2, 3, 4, 5]);
        let it = match root.find_by(&probe_for(5)) {
            Some(it) => it,
            None => panic!("missing element"),
        };
        // removing the max exercises unwind along the right spine
        let new_root = match it.remove() {
            Some(n) => n,
            None => panic!("tree should not be empty"),
        };
        chk(&new_root);
        assert!(new_root.get_by(probe_for(5)).is_none());
        assert!(root.get_by(probe_for(5)).is_some());
    }
}
