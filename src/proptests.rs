use super::*;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(u64),
    Contains(u64),
}

fn key_strategy() -> impl Strategy<Value = u64> + Clone {
    // a narrow band keeps duplicates and shared low bits common
    prop_oneof![
        2 => 0u64..256,
        1 => any::<u64>(),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        3 => key.clone().prop_map(Op::Insert),
        1 => key.prop_map(Op::Contains),
    ];
    prop::collection::vec(op, 0..=600)
}

/// Check every bucket against its directory position and depth
fn validate_buckets<H: KeyHasher>(
    buckets: iter::Buckets<'_>,
    global_depth: u8,
    directory_size: usize,
    hasher: &H,
    side: Side,
) {
    let mut covered = 0usize;
    for bucket in buckets {
        let depth = bucket.local_depth();
        assert!(depth <= global_depth, "local depth above global depth");
        assert!(
            bucket.first_address() < 1usize << depth,
            "first address outside its depth"
        );
        assert!(bucket.len() <= bucket.capacity(), "bucket over capacity");

        let mask = (1u64 << depth) - 1;
        for &key in bucket.keys() {
            assert_eq!(
                (hasher.hash(side, key) & mask) as usize,
                bucket.first_address(),
                "key {key} in the wrong bucket"
            );
        }
        covered += 1usize << (global_depth - depth);
    }
    assert_eq!(covered, directory_size, "aliases must cover the directory");
}

fn run_against_model(set: &mut dyn KeySet, ops: &[Op]) -> std::result::Result<(), TestCaseError> {
    let mut model: BTreeSet<u64> = BTreeSet::new();

    for op in ops {
        match *op {
            Op::Insert(key) => {
                let inserted = set.try_insert(key);
                prop_assert_eq!(inserted, Ok(model.insert(key)));
            }
            Op::Contains(key) => {
                prop_assert_eq!(set.contains(key), model.contains(&key));
            }
        }

        prop_assert_eq!(set.len(), model.len());
    }

    prop_assert!(set.capacity() >= set.len());
    for key in &model {
        prop_assert!(set.contains(*key), "missing {}", key);
    }

    let mut got: Vec<u64> = set.keys().collect();
    got.sort_unstable();
    let expected: Vec<u64> = model.into_iter().collect();
    prop_assert_eq!(got, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_linear_matches_model(ops in ops_strategy()) {
        let mut set = LinearSet::with_config(LinearConfig::new(2)).unwrap();
        run_against_model(&mut set, &ops)?;
    }

    #[test]
    fn prop_cuckoo_matches_model(ops in ops_strategy()) {
        let mut set = CuckooSet::with_config(CuckooConfig::new(2)).unwrap();
        run_against_model(&mut set, &ops)?;
        prop_assert!(set.stats().load_factor() <= 1.0);
    }

    #[test]
    fn prop_extendible_matches_model(ops in ops_strategy(), bucket_capacity in 1usize..6) {
        let config = ExtendibleConfig::new(bucket_capacity);
        let mut set = ExtendibleSet::with_config(config).unwrap();
        run_against_model(&mut set, &ops)?;

        validate_buckets(
            set.buckets(),
            set.global_depth(),
            set.directory_size(),
            set.hasher(),
            Side::First,
        );
        prop_assert_eq!(set.stats().counters.splits as usize, set.bucket_count() - 1);
    }

    #[test]
    fn prop_hybrid_matches_model(ops in ops_strategy(), max_chain in 1usize..40) {
        let config = HybridConfig::new(1).with_max_chain(max_chain);
        let mut set = HybridSet::with_config(config).unwrap();
        run_against_model(&mut set, &ops)?;

        for side in Side::BOTH {
            validate_buckets(
                set.buckets(side),
                set.global_depth(side),
                set.directory_size(side),
                set.hasher(),
                side,
            );
        }
        let located = (0..=255u64).filter(|&k| set.locate(k).is_some()).count();
        let expected = set.keys().filter(|&k| k <= 255).count();
        prop_assert_eq!(located, expected);
    }

    #[test]
    fn prop_sets_agree(keys in prop::collection::vec(key_strategy(), 0..=300)) {
        let mut sets: Vec<Box<dyn KeySet>> = vec![
            Box::new(LinearSet::new()),
            Box::new(CuckooSet::new()),
            Box::new(ExtendibleSet::new()),
            Box::new(HybridSet::new()),
        ];

        for &key in &keys {
            let results: Vec<bool> = sets.iter_mut().map(|s| s.insert(key)).collect();
            prop_assert!(results.windows(2).all(|w| w[0] == w[1]), "{:?}", results);
        }

        let len = sets[0].len();
        for set in &sets {
            prop_assert_eq!(set.len(), len);
            for &key in &keys {
                prop_assert!(set.contains(key));
            }
        }
    }
}
