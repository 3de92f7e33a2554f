//! A functional supply of unique values.

use std::sync::{Arc, Mutex, MutexGuard};

// Lock a mutex, disregarding poisoning: the guarded sections only move and
// clone plain values, and a panicking clone leaves the counter no worse
// than any other interleaving would.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

type Succ<A> = dyn Fn(&A) -> A + Send + Sync;

// State shared by every supply split off the same origin.
struct Common<A> {
    next: Mutex<A>,
    succ: Box<Succ<A>>,
}

// Per-handle memoization.  Both fields are filled at most once, under the
// common mutex, and never change afterwards.
struct State<A> {
    value: Option<A>,
    split: Option<(Supply<A>, Supply<A>)>,
}

/// A persistent, thread-safe generator of distinct values.
///
/// A supply is a *value*: clones of a handle denote the same supply and
/// yield the same results.  [`get`] returns this handle's unique value,
/// which is captured from the shared counter on first use and identical on
/// every later call, no matter how much the handle is passed around.
/// [`split2`] produces two child supplies, each distinct from the parent
/// and from each other; it too is memoized, so repeated calls return the
/// same pair.
///
/// [`get`]: Supply::get
/// [`split2`]: Supply::split2
///
/// # Examples
/// ```
/// use twothree_collections::Supply;
///
/// let s = Supply::new(0);
/// let (a, b) = s.split2();
/// assert_ne!(a.get(), b.get());
/// assert_eq!(a.get(), a.clone().get());
/// ```
pub struct Supply<A> {
    common: Arc<Common<A>>,
    state: Arc<Mutex<State<A>>>,
}

impl<A> Clone for Supply<A> {
    fn clone(&self) -> Self {
        Supply {
            common: Arc::clone(&self.common),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A> std::fmt::Debug for Supply<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supply").finish_non_exhaustive()
    }
}

impl Supply<i64> {
    /// Creates a supply of integers counting up from `init`.
    pub fn new(init: i64) -> Self {
        Supply::with_successor(init, |n| n + 1)
    }
}

impl<A: Clone> Supply<A> {
    /// Creates a supply over an arbitrary domain: `init` is the first value
    /// handed out and `succ` produces each following one.
    pub fn with_successor<F>(init: A, succ: F) -> Self
    where
        F: Fn(&A) -> A + Send + Sync + 'static,
    {
        Supply {
            common: Arc::new(Common {
                next: Mutex::new(init),
                succ: Box::new(succ),
            }),
            state: Arc::new(Mutex::new(State {
                value: None,
                split: None,
            })),
        }
    }

    fn from_common(common: &Arc<Common<A>>) -> Self {
        Supply {
            common: Arc::clone(common),
            state: Arc::new(Mutex::new(State {
                value: None,
                split: None,
            })),
        }
    }

    /// This supply's unique value.
    ///
    /// The first call captures the current counter value and advances the
    /// counter; every later call on this handle (or any clone of it)
    /// returns the captured value.
    pub fn get(&self) -> A {
        // lock order: common counter first, then per-handle state
        let mut next = lock(&self.common.next);
        let mut st = lock(&self.state);
        match &st.value {
            Some(v) => v.clone(),
            None => {
                let v = next.clone();
                *next = (self.common.succ)(&v);
                st.value = Some(v.clone());
                v
            }
        }
    }

    /// Splits this supply into two new supplies, each different from the
    /// input supply.  Memoized: every call returns the same pair.
    pub fn split2(&self) -> (Supply<A>, Supply<A>) {
        let mut st = lock(&self.state);
        let pair = st.split.get_or_insert_with(|| {
            (
                Supply::from_common(&self.common),
                Supply::from_common(&self.common),
            )
        });
        pair.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn get_is_stable_per_handle() {
        let s = Supply::new(100);
        assert_eq!(s.get(), 100);
        assert_eq!(s.get(), 100);
        assert_eq!(s.clone().get(), 100);
    }

    #[test]
    fn split2_is_memoized() {
        let s = Supply::new(0);
        let _ = s.get();
        let (a, b) = s.split2();
        let (a2, b2) = s.split2();
        assert_eq!(a.get(), a2.get());
        assert_eq!(b.get(), b2.get());
        assert_ne!(a.get(), b.get());
        assert_ne!(a.get(), s.get());
    }

    #[test]
    fn custom_successor() {
        let s = Supply::with_successor(1u64, |n| n * 2);
        let (a, b) = s.split2();
        let (c, _) = b.split2();
        let mut got = vec![s.get(), a.get(), b.get(), c.get()];
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 4, 8]);
    }

    #[test]
    fn distinct_across_threads() {
        let s = Supply::new(0);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let sup = s.clone();
            handles.push(thread::spawn(move || {
                let mut got = Vec::new();
                let mut cur = sup;
                for _ in 0..100 {
                    let (a, b) = cur.split2();
                    got.push(a.get());
                    cur = b;
                }
                got
            }));
        }

        let mut seen = HashSet::new();
        for h in handles {
            for v in h.join().expect("worker panicked") {
                // split2 is memoized, so the eight threads share the same
                // first split; dedup across threads before checking
                seen.insert(v);
            }
        }
        // every thread walks the same memoized spine, so the values seen
        // must agree wherever they overlap and all be distinct
        assert_eq!(seen.len(), 100);
    }
}
