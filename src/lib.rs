//! # Appspec Manifest Library
//!
//! This library derives, from a git repository, the set of deployable
//! applications present at a revision, and narrows that set to the
//! applications affected by a range of commits. It backs the `appspec`
//! command-line tool but has no dependency on it.
//!
//! ## Quick Example
//!
//! ```no_run
//! use appspec::resolver::{manifest_by_branch, manifest_by_revision_range};
//!
//! // Every application on main.
//! let manifest = manifest_by_branch("/srv/monorepo", "main").unwrap();
//! for app in &manifest.applications {
//!     println!("{} {} {}", app.path(), app.name(), app.version);
//! }
//!
//! // Only the applications a feature branch touches.
//! let changed = manifest_by_revision_range("/srv/monorepo", "feature", "main").unwrap();
//! assert_eq!(changed.sha, manifest_by_branch("/srv/monorepo", "feature").unwrap().sha);
//! ```
//!
//! ## Core Concepts
//!
//! - **Descriptors (`application`)**: an application is any directory holding
//!   a descriptor file, `appspec.yaml` by default, naming the application.
//! - **Versions (`manifest`)**: each application is versioned by the content
//!   identifier of its directory tree, so its version changes exactly when
//!   something inside it changes.
//! - **Manifests (`manifest`)**: the applications found at one commit, with
//!   lookups by name and by path prefix.
//! - **Reduction (`reduce`)**: narrowing a manifest to the applications whose
//!   directories contain changed files.
//! - **Repository access (`repository`, `git`)**: the backend interface the
//!   engine consumes and its implementation over the system `git` binary.
//!
//! ## Execution Flow
//!
//! A resolver (`resolver`) resolves a revision to a commit, walks the
//! commit's tree for descriptors (`locator`), and assembles the manifest.
//! For a revision range it also diffs the two trees and reduces the
//! manifest to the changed applications. Every step is fail-fast: a single
//! unreadable or malformed descriptor fails the whole derivation.

pub mod application;
pub mod defaults;
pub mod error;
pub mod git;
pub mod locator;
pub mod manifest;
pub mod output;
pub mod reduce;
pub mod repository;
pub mod resolver;
pub mod suggestions;

#[cfg(test)]
mod mock_backend;
#[cfg(test)]
mod reduce_proptest;
