//! Narrowing a manifest to the applications touched by a diff.
//!
//! An application is affected when any changed file lies inside its
//! directory. Matching is done on whole path segments: a change to
//! `app10/main.go` does not affect an application at `app1`.

use std::collections::HashSet;

use log::trace;

use crate::error::Result;
use crate::manifest::Manifest;
use crate::repository::DiffDelta;

/// Whether `changed` lies under the directory `prefix`.
///
/// `prefix` is an application path, with or without its trailing `/`.
pub fn is_under(changed: &str, prefix: &str) -> bool {
    let dir = prefix.trim_end_matches('/');
    if dir.is_empty() {
        return false;
    }
    changed
        .strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Keep only the applications of `manifest` whose directory contains a file
/// changed on the new side of `deltas`.
///
/// The result shares `dir` and `sha` with `manifest` and lists applications
/// in manifest order. The first error from `deltas` is returned as is and no
/// manifest is produced.
pub fn reduce<I>(manifest: &Manifest, deltas: I) -> Result<Manifest>
where
    I: IntoIterator<Item = Result<DiffDelta>>,
{
    let index = manifest.index_by_path();
    let mut matched: HashSet<&str> = HashSet::new();

    for delta in deltas {
        let delta = delta?;
        trace!("{:?} {}", delta.status, delta.new_path);

        if matched.len() == index.len() {
            // Every application is already in; keep draining for errors.
            continue;
        }
        for prefix in index.keys() {
            if matched.contains(prefix.as_str()) {
                continue;
            }
            if is_under(&delta.new_path, prefix) {
                matched.insert(prefix.as_str());
            }
        }
    }

    let applications = manifest
        .applications
        .iter()
        .filter(|app| matched.contains(app.path_prefix().as_str()))
        .cloned()
        .collect();

    Ok(Manifest {
        dir: manifest.dir.clone(),
        sha: manifest.sha.clone(),
        applications,
    })
}
