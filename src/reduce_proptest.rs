//! Property-based tests for manifest reduction.
//!
//! These tests use proptest to generate manifests and change sets and verify
//! that the reduction invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::tests::{oid, versioned};
    use crate::manifest::Manifest;
    use crate::reduce::{is_under, reduce};
    use crate::repository::{DeltaStatus, DiffDelta};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn manifest_from(paths: &BTreeSet<String>) -> Manifest {
        let applications = paths
            .iter()
            .enumerate()
            .map(|(i, path)| versioned(&format!("app{}", i), path, 'a'))
            .collect();
        Manifest::assemble("/srv/repo", oid('c'), applications)
    }

    fn deltas(paths: &[String]) -> Vec<crate::error::Result<DiffDelta>> {
        paths
            .iter()
            .map(|p| Ok(DiffDelta::at(DeltaStatus::Modified, p)))
            .collect()
    }

    fn app_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z0-9]{1,6}", 1..4).prop_map(|segments| segments.join("/"))
    }

    // ============================================================================
    // is_under property tests
    // ============================================================================

    proptest! {
        /// Property: any file below a directory is under it
        #[test]
        fn file_below_directory_is_under(dir in app_path(), rest in "[a-z0-9./]{1,20}") {
            let changed = format!("{}/{}", dir, rest);
            prop_assert!(is_under(&changed, &dir));
            let dir_slash = format!("{}/", dir);
            prop_assert!(is_under(&changed, &dir_slash));
        }

        /// Property: extending the last segment never matches the shorter name
        #[test]
        fn sibling_with_longer_name_is_not_under(
            dir in app_path(),
            extra in "[a-z0-9]{1,4}",
            rest in "[a-z0-9]{1,10}",
        ) {
            let changed = format!("{}{}/{}", dir, extra, rest);
            prop_assert!(!is_under(&changed, &dir));
        }

        /// Property: a directory is never under itself
        #[test]
        fn directory_is_not_under_itself(dir in app_path()) {
            prop_assert!(!is_under(&dir, &dir));
        }
    }

    // ============================================================================
    // reduce property tests
    // ============================================================================

    proptest! {
        /// Property: reduction yields a subset and keeps dir and sha
        #[test]
        fn reduce_is_subset(
            paths in prop::collection::btree_set(app_path(), 0..8),
            changed in prop::collection::vec("[a-z0-9/]{1,30}", 0..12),
        ) {
            let manifest = manifest_from(&paths);
            let reduced = reduce(&manifest, deltas(&changed)).unwrap();

            prop_assert_eq!(&reduced.dir, &manifest.dir);
            prop_assert_eq!(&reduced.sha, &manifest.sha);
            for app in &reduced.applications {
                prop_assert!(manifest.applications.contains(app));
            }
            let unique: BTreeSet<&str> = reduced.paths().collect();
            prop_assert_eq!(unique.len(), reduced.len());
        }

        /// Property: no changes means no applications
        #[test]
        fn reduce_without_changes_is_empty(paths in prop::collection::btree_set(app_path(), 0..8)) {
            let manifest = manifest_from(&paths);
            let reduced = reduce(&manifest, Vec::new()).unwrap();
            prop_assert!(reduced.is_empty());
        }

        /// Property: touching a descriptor always selects its application
        #[test]
        fn descriptor_change_selects_application(
            paths in prop::collection::btree_set(app_path(), 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let manifest = manifest_from(&paths);
            let target = pick.get(&manifest.applications).path().to_string();
            let changed = vec![format!("{}/appspec.yaml", target)];

            let reduced = reduce(&manifest, deltas(&changed)).unwrap();
            prop_assert!(reduced.contains_path(&target));
        }

        /// Property: reduction is idempotent for the same change set
        #[test]
        fn reduce_is_idempotent(
            paths in prop::collection::btree_set(app_path(), 0..8),
            changed in prop::collection::vec("[a-z0-9/]{1,30}", 0..12),
        ) {
            let manifest = manifest_from(&paths);
            let once = reduce(&manifest, deltas(&changed)).unwrap();
            let twice = reduce(&once, deltas(&changed)).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
