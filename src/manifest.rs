//! # Manifests
//!
//! A [`Manifest`] is the set of applications found in a repository at one
//! commit. Each entry is a [`VersionedApplication`]: the application plus
//! the content identifier of its directory at that commit, so two manifests
//! agree on an application's version exactly when nothing under its
//! directory changed.
//!
//! Applications are keyed by path, which is unique within a manifest. The
//! order of `applications` carries no meaning.
//!
//! Two lookup views are derived on demand and never stored:
//!
//! - [`Manifest::index_by_name`] maps name to application. Names are not
//!   guaranteed unique; the last application in sequence wins.
//! - [`Manifest::index_by_path`] maps `path + "/"` to application. The
//!   trailing separator makes the keys usable as directory prefixes when
//!   matching changed file paths.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::Application;
use crate::repository::ObjectId;

/// An application together with the identifier of its directory tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedApplication {
    pub application: Application,
    pub version: ObjectId,
}

impl VersionedApplication {
    pub fn new(application: Application, version: ObjectId) -> Self {
        Self {
            application,
            version,
        }
    }

    pub fn name(&self) -> &str {
        &self.application.name
    }

    pub fn path(&self) -> &str {
        &self.application.path
    }

    /// Key of this application in [`Manifest::index_by_path`].
    pub fn path_prefix(&self) -> String {
        format!("{}/", self.application.path)
    }
}

/// Applications present in a repository at one commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Repository location the manifest was derived from.
    pub dir: String,
    /// Full identifier of the resolved commit.
    pub sha: ObjectId,
    pub applications: Vec<VersionedApplication>,
}

impl Manifest {
    /// Wrap discovered applications with their repository and revision.
    pub fn assemble(
        dir: impl Into<String>,
        sha: ObjectId,
        applications: Vec<VersionedApplication>,
    ) -> Self {
        Manifest {
            dir: dir.into(),
            sha,
            applications,
        }
    }

    /// Applications keyed by name. On duplicate names the later one wins.
    pub fn index_by_name(&self) -> HashMap<&str, &VersionedApplication> {
        self.applications
            .iter()
            .map(|app| (app.name(), app))
            .collect()
    }

    /// Applications keyed by `path + "/"`.
    pub fn index_by_path(&self) -> HashMap<String, &VersionedApplication> {
        self.applications
            .iter()
            .map(|app| (app.path_prefix(), app))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Application paths in manifest order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.applications.iter().map(VersionedApplication::path)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths().any(|p| p == path)
    }

    /// Look up an application by its path.
    pub fn get(&self, path: &str) -> Option<&VersionedApplication> {
        self.applications.iter().find(|app| app.path() == path)
    }
}
