use organize_fs::find_unused_filename;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn numbered(stem: &str, n: u64) -> PathBuf {
    PathBuf::from(format!("/data/{stem} ({n}).txt"))
}

proptest! {
    #[test]
    fn test_next_counter_after_contiguous_run(stem in "[a-zA-Z][a-zA-Z0-9_]{0,12}", k in 0u64..40) {
        let mut taken: BTreeSet<PathBuf> = (1..=k).map(|n| numbered(&stem, n)).collect();
        taken.insert(PathBuf::from(format!("/data/{stem}.txt")));

        let result = find_unused_filename(&PathBuf::from(format!("/data/{stem}.txt")), |p| taken.contains(p));
        prop_assert_eq!(result, numbered(&stem, k + 1));
    }

    #[test]
    fn test_result_is_always_free(stem in "[a-z]{1,8}", taken_counters in proptest::collection::btree_set(1u64..20, 0..20)) {
        let desired = PathBuf::from(format!("/data/{stem}.txt"));
        let mut taken: BTreeSet<PathBuf> = taken_counters.iter().map(|n| numbered(&stem, *n)).collect();
        taken.insert(desired.clone());

        let result = find_unused_filename(&desired, |p: &Path| taken.contains(p));
        prop_assert!(!taken.contains(&result));
        prop_assert_eq!(result.parent(), desired.parent());
    }

    #[test]
    fn test_sequential_claims_never_collide(stem in "[a-z]{1,8}", claims in 1usize..15) {
        let desired = PathBuf::from(format!("/data/{stem}.txt"));
        let mut taken: BTreeSet<PathBuf> = BTreeSet::new();
        for _ in 0..claims {
            let next = find_unused_filename(&desired, |p| taken.contains(p));
            prop_assert!(taken.insert(next));
        }
        prop_assert_eq!(taken.len(), claims);
    }
}
