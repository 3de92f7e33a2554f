//! # Persistent ordered collections over a structure-sharing 2-3 tree
//!
//! `twothree-collections` is a set of *persistent* (immutable,
//! structurally-shared) ordered containers.  Every update returns a new
//! container whose unchanged subtrees are shared with the old one, so
//! "copies" cost a few reference-count bumps and old snapshots remain valid
//! forever.  Because no shared state is ever mutated in place, snapshots can
//! be handed between threads without any synchronization: a producer can
//! race ahead updating its own value, secure in the knowledge that consumers
//! only see the versions they were sent.
//!
//! All containers are built on one engine: a 2-3 tree ([`Set`]) in which
//! insert, remove, lookup and ordered iteration are O(log n) and every
//! mutating operation returns a new root.  [`Map`] stores key-ordered
//! entries in a [`Set`]; [`MultiMap`] additionally tags entries with values
//! drawn from a [`Supply`] so duplicate keys coexist; [`LruCache`],
//! [`Queue`], [`Seq`], and [`Bijection`] are thin layers over [`Map`].
//! [`List`] is the persistent singly-linked list the tree iterators record
//! their paths in.
//!
//! # Examples
//! ```
//! use twothree_collections::Set;
//!
//! let s = Set::new().insert(7).insert(10).insert(5);
//! let t = s.insert(6);
//!
//! // `s` is a snapshot; the insert that produced `t` did not disturb it.
//! assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![5, 7, 10]);
//! assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![5, 6, 7, 10]);
//! ```

pub mod bijection;
pub mod list;
pub mod lru;
pub mod map;
pub mod multimap;
pub mod queue;
pub mod seq;
pub mod set;
pub mod supply;

mod tree;

pub use bijection::Bijection;
pub use list::List;
pub use lru::LruCache;
pub use map::Map;
pub use multimap::MultiMap;
pub use queue::Queue;
pub use seq::Seq;
pub use set::Set;
pub use supply::Supply;

/// Errors returned by the fallible container operations.
///
/// The taxonomy is deliberately small: everything else in the crate reports
/// absence through `Option` rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// [`Queue::pop`] was called on an empty queue.
    #[error("queue empty")]
    QueueEmpty,

    /// A fold with no initial value was applied to an empty container.
    #[error("empty container")]
    EmptyContainer,
}
