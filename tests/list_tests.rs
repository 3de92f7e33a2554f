use twothree_collections::{Error, List};

fn from_vec<A: Clone>(v: &[A]) -> List<A> {
    v.iter().cloned().collect()
}

#[test]
fn build_and_compare() {
    let l = List::new().cons(56).cons(55);
    assert_eq!(l, from_vec(&[55, 56]));

    let l: List<char> = "abc".chars().collect();
    assert_eq!(l, from_vec(&['a', 'b', 'c']));
}

#[test]
fn concatenation() {
    let l = from_vec(&[10, 11, 12]) + from_vec(&[20, 21, 22]);
    assert_eq!(l, from_vec(&[10, 11, 12, 20, 21, 22]));
}

#[test]
fn display_format() {
    assert_eq!(from_vec(&[1, 2, 3]).to_string(), "[1,2,3]");
    assert_eq!(List::<i32>::new().to_string(), "[]");
}

#[test]
fn empty_folds_report_empty_container() {
    let empty: List<i32> = List::new();
    assert_eq!(empty.foldl1(|b, _| b), Err(Error::EmptyContainer));
    assert_eq!(empty.foldr1(|_, b| b), Err(Error::EmptyContainer));
    assert_eq!(
        Error::EmptyContainer.to_string(),
        "empty container"
    );
}

#[test]
fn deep_lists_drop_without_overflowing_the_stack() {
    let mut l = List::new();
    for i in 0..200_000 {
        l = l.cons(i);
    }
    assert_eq!(l.len(), 200_000);
    assert_eq!(l.head(), Some(&199_999));
    drop(l);
}

#[test]
fn deep_shared_lists_drop_cleanly() {
    let mut l = List::new();
    for i in 0..100_000 {
        l = l.cons(i);
    }
    let other = l.cons(-1);
    // dropping `l` leaves the chain alive through `other` ...
    drop(l);
    assert_eq!(other.len(), 100_001);
    assert_eq!(other.get(1), Some(&99_999));
    // ... and the final owner still unlinks iteratively
    drop(other);
}

#[test]
fn long_operations_stay_iterative() {
    let big: List<i32> = (0..100_000).collect();
    assert_eq!(big.reverse().head(), Some(&99_999));
    assert_eq!(big.map(|x| x + 1).head(), Some(&1));
    assert_eq!(big.filter(|x| x % 2 == 0).len(), 50_000);
    assert_eq!(big.foldr(|a, b| if *a == 0 { b + 1 } else { b }, 0), 1);
    let (front, rest) = big.split_at(70_000);
    assert_eq!(front.len(), 70_000);
    assert_eq!(rest.len(), 30_000);
}
