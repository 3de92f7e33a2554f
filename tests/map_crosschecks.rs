use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap as StdMap;
use twothree_collections::Map;

mod common;
use common::*;

const TEST_SIZE: i32 = 5000;

fn make_matching_maps<K, V>(v: Vec<(K, V)>) -> (Map<K, V>, StdMap<K, V>)
where
    K: Clone + Ord,
    V: Clone,
{
    let m1 = Map::from_iter(v.clone());
    let m2 = StdMap::from_iter(v);
    (m1, m2)
}

fn chk<K, V>(ours: &Map<K, V>, golden: &StdMap<K, V>)
where
    K: Clone + Ord + std::fmt::Debug,
    V: Clone + Eq + std::fmt::Debug,
{
    assert_eq!(ours.len(), golden.len());
    assert_eq_iters(ours.iter(), golden.iter());
}

#[test]
fn random_insert_find_remove_matches_the_oracle() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut ours = Map::new();
    let mut golden = StdMap::new();

    for _ in 0..TEST_SIZE {
        let x = rng.gen_range(0..TEST_SIZE);
        ours = ours.insert(x, x);
        golden.insert(x, x);

        let probe = rng.gen_range(0..TEST_SIZE);
        assert_eq!(ours.contains_key(&probe), golden.contains_key(&probe));
        if golden.contains_key(&probe) {
            golden.remove(&probe);
            ours = ours.remove(&probe);
        }
    }
    chk(&ours, &golden);
}

#[test]
fn lookup_after_insert() {
    let m: Map<i32, i32> = (0..100).map(|i| (i, i * 3)).collect();
    for i in 0..100 {
        assert_eq!(m.lookup(&i), Some(i * 3));
        assert_eq!(m.get(&i), Some(&(i * 3)));
    }
    assert_eq!(m.get(&100), None);
}

proptest! {
    #[test]
    fn test_iteration_matches(v in small_int_pairs()) {
        let (ours, golden) = make_matching_maps(v);
        chk(&ours, &golden);
    }

    #[test]
    fn test_insert_then_lookup(v in small_int_pairs(), k in 0u16..1024, x in 0u16..1024) {
        let (ours, _) = make_matching_maps(v);
        prop_assert_eq!(ours.insert(k, x).lookup(&k), Some(x));
    }

    #[test]
    fn test_remove(v in small_int_pairs(), w in u16_seq(1024, 64)) {
        let (mut ours, mut golden) = make_matching_maps(v);
        for k in w {
            ours = ours.remove(&k);
            golden.remove(&k);
        }
        chk(&ours, &golden);
    }

    #[test]
    fn test_alter_as_upsert_and_delete(v in small_int_pairs(), k in 0u16..1024) {
        let (ours, mut golden) = make_matching_maps(v);

        let bumped = ours.alter(k, |v| Some(v.copied().unwrap_or(0) + 1));
        let expected = golden.get(&k).copied().unwrap_or(0) + 1;
        prop_assert_eq!(bumped.lookup(&k), Some(expected));

        let dropped = ours.alter(k, |_| None);
        golden.remove(&k);
        chk(&dropped, &golden);
    }

    #[test]
    fn test_adjust_only_touches_present_keys(v in small_int_pairs(), k in 0u16..1024) {
        let (ours, golden) = make_matching_maps(v);
        let adjusted = ours.adjust(&k, |v| v.wrapping_add(1));
        match golden.get(&k) {
            Some(v) => {
                prop_assert_eq!(adjusted.lookup(&k), Some(v.wrapping_add(1)))
            }
            None => prop_assert_eq!(adjusted, ours),
        }
    }

    #[test]
    fn test_union_is_right_biased(u in small_int_pairs(), v in small_int_pairs()) {
        let (a, mut golden_a) = make_matching_maps(u);
        let (b, golden_b) = make_matching_maps(v);

        let ours = a + b;
        golden_a.extend(golden_b);
        chk(&ours, &golden_a);
    }

    #[test]
    fn test_keys_and_elems(v in small_int_pairs()) {
        let (ours, golden) = make_matching_maps(v);
        assert_eq_iters(ours.keys().iter(), golden.keys());
        assert_eq_iters(ours.elems().iter(), golden.values());
    }

    #[test]
    fn test_bounds(v in small_int_pairs(), k in 0u16..1100) {
        let (ours, golden) = make_matching_maps(v);

        let got = ours.lower_bound(&k).map(|c| (*c.key(), *c.value()));
        let expected =
            golden.range(k..).next().map(|(k, v)| (*k, *v));
        prop_assert_eq!(got, expected);

        let got = ours.upper_bound(&k).map(|c| (*c.key(), *c.value()));
        let expected =
            golden.range(..=k).next_back().map(|(k, v)| (*k, *v));
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn test_cursor_walk(v in small_int_pairs()) {
        let (ours, golden) = make_matching_maps(v);
        let mut expected = golden.iter();
        let mut cur = ours.begin();
        while let Some(c) = cur {
            prop_assert_eq!(Some((c.key(), c.value())), expected.next());
            cur = c.next();
        }
        prop_assert_eq!(expected.next(), None);
    }

    #[test]
    fn test_snapshot_isolation(v in small_int_pairs(), k in 0u16..1024) {
        let (ours, _) = make_matching_maps(v);
        let before: Vec<(u16, u16)> =
            ours.iter().map(|(k, v)| (*k, *v)).collect();
        let _changed = ours.insert(k, 9999);
        let _removed = ours.remove(&k);
        let after: Vec<(u16, u16)> =
            ours.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(before, after);
    }
}
