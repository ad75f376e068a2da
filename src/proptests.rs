use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

fn validate_tree(t: &RadixMap) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "tree invariants violated: {issues:?}");
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // A tiny alphabet keeps shared prefixes, splits and merges frequent.
    prop::collection::vec(b'a'..=b'd', 0..=8)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Put(
        #[proptest(strategy = "key_strategy()")] Vec<u8>,
        #[proptest(strategy = "1u32..=1000")] u32,
    ),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 15)]
    Get(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 10)]
    Prefix(#[proptest(strategy = "prop::collection::vec(b'a'..=b'd', 0..=3)")] Vec<u8>),
}

fn sorted_entries(t: &RadixMap, prefix: &[u8]) -> Vec<(Vec<u8>, u32)> {
    let mut got: Vec<_> = t.prefix_iter(prefix).collect();
    got.sort();
    got
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_btreemap(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t = RadixMap::new();
        let mut m: BTreeMap<Vec<u8>, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    prop_assert_eq!(t.put(&key, value), Ok(m.insert(key, value)));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(key.as_slice()));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(key.as_slice()).copied());
                }
                Op::Prefix(prefix) => {
                    let got = sorted_entries(&t, &prefix);
                    let expected: Vec<(Vec<u8>, u32)> = m
                        .range(prefix.clone()..)
                        .take_while(|(k, _)| k.starts_with(&prefix))
                        .map(|(k, v)| (k.clone(), *v))
                        .collect();
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got = sorted_entries(&t, b"");
        let expected: Vec<(Vec<u8>, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_equivalence_linear(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let mut t = RadixMap::new();
        let mut l = LinearMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    prop_assert_eq!(t.put(&key, value), l.put(&key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), l.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), l.get(&key));
                }
                Op::Prefix(prefix) => {
                    let mut a: Vec<u8> = Vec::with_capacity(16);
                    a.extend_from_slice(&prefix);
                    let mut b: Vec<u8> = Vec::with_capacity(16);
                    b.extend_from_slice(&prefix);
                    prop_assert_eq!(t.complete(&mut a), l.complete(&mut b));
                    prop_assert_eq!(a, b);
                }
            }
            validate_tree(&t);
        }
    }

    #[test]
    fn prop_prefix_for_each_bounded(
        keys in prop::collection::btree_set(key_strategy(), 0..=40),
        prefix in prop::collection::vec(b'a'..=b'd', 0..=2),
        max_results in 0usize..=5,
    ) {
        let mut t = RadixMap::new();
        for (i, k) in keys.iter().enumerate() {
            t.put(k, i as u32 + 1).unwrap();
        }
        let matching = keys.iter().filter(|k| k.starts_with(&prefix)).count();
        let expected = if max_results == 0 { matching } else { matching.min(max_results) };

        let mut buf: Vec<u8> = Vec::with_capacity(16);
        buf.extend_from_slice(&prefix);
        let mut seen = Vec::new();
        let n = t.prefix_for_each(&mut buf, max_results, |k, _| seen.push(k.to_vec()));
        prop_assert_eq!(n, Ok(expected));
        prop_assert_eq!(seen.len(), expected);
        prop_assert!(seen.iter().all(|k| k.starts_with(&prefix) && keys.contains(k)));
        prop_assert_eq!(buf, prefix);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(
        items: &[T],
        used: &mut [bool],
        out: &mut Vec<T>,
        f: &mut impl FnMut(Vec<T>),
    ) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_keys() -> Vec<Vec<u8>> {
    vec![
        b"".to_vec(),
        b"a".to_vec(),
        b"b".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"abc".to_vec(),
        b"ba".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_keys();
    let expected_shape = {
        let mut t = RadixMap::new();
        for (i, k) in keys.iter().enumerate() {
            t.put(k, i as u32 + 1).unwrap();
        }
        t.node_count()
    };

    for_each_permutation(&keys, |perm| {
        let mut t = RadixMap::new();
        let mut m: BTreeMap<Vec<u8>, u32> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u32 + 1;
            assert_eq!(t.put(&k, v), Ok(m.insert(k, v)));
        }

        validate_tree(&t);
        // The compressed shape depends only on the key set.
        assert_eq!(t.node_count(), expected_shape);
        let got = sorted_entries(&t, b"");
        let expected: Vec<(Vec<u8>, u32)> = m.into_iter().collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = small_keys();

    // Insert in a fixed order, then remove in all permutations.
    let mut base_tree = RadixMap::new();
    let mut base_map: BTreeMap<Vec<u8>, u32> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        let v = i as u32 + 1;
        assert_eq!(base_tree.put(k, v), Ok(base_map.insert(k.clone(), v)));
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_tree.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(k.as_slice()));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
            for (key, value) in &m {
                assert_eq!(t.get(key), Some(*value));
            }
        }
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
    });
}
