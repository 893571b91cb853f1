//! # Revision Resolvers
//!
//! Entry points that derive a [`Manifest`] from a repository at some
//! revision:
//!
//! - [`manifest_by_branch`]: the full manifest at a branch, tag, or ref.
//! - [`manifest_by_sha`]: the full manifest at a raw hex commit identifier.
//! - [`manifest_by_revision_range`]: the applications at `from` touched by
//!   the changes `from` introduces relative to `to`, as a pull request from
//!   `from` into `to` would see them.
//!
//! Each call opens the repository, derives the manifest from scratch, and
//! releases the handle before returning. Nothing is cached between calls.
//! Any failing step fails the whole call.
//!
//! The free functions use the system `git` backend. [`ManifestResolver`]
//! accepts any [`RepositoryBackend`] for callers that already hold one.

use log::{debug, info};

use crate::defaults::DEFAULT_DESCRIPTOR_NAME;
use crate::error::Result;
use crate::git::GitRepository;
use crate::locator::locate;
use crate::manifest::Manifest;
use crate::reduce::reduce;
use crate::repository::{Commit, ObjectId, RepositoryBackend, Tree};

/// Options shared by all resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// File name that marks an application directory.
    pub descriptor_name: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            descriptor_name: DEFAULT_DESCRIPTOR_NAME.to_string(),
        }
    }
}

/// Derives manifests from one repository.
pub struct ManifestResolver {
    repo: Box<dyn RepositoryBackend>,
    options: ResolveOptions,
}

impl ManifestResolver {
    /// Open the git repository at `location` with default options.
    pub fn open(location: &str) -> Result<Self> {
        Self::open_with_options(location, ResolveOptions::default())
    }

    /// Open the git repository at `location`.
    pub fn open_with_options(location: &str, options: ResolveOptions) -> Result<Self> {
        let repo = GitRepository::open(location)?;
        Ok(Self::with_backend(Box::new(repo), options))
    }

    /// Resolve against an already opened backend.
    pub fn with_backend(repo: Box<dyn RepositoryBackend>, options: ResolveOptions) -> Self {
        Self { repo, options }
    }

    /// Full manifest at a branch, tag, or other reference.
    pub fn by_branch(&self, branch: &str) -> Result<Manifest> {
        let commit = self.repo.resolve_reference(branch)?;
        debug!("Branch {} is at {}", branch, commit.id);
        self.from_commit(&commit)
    }

    /// Full manifest at a commit given as hex.
    pub fn by_sha(&self, sha: &str) -> Result<Manifest> {
        let id = ObjectId::from_hex(sha, self.repo.object_format())?;
        let commit = self.repo.lookup_commit(&id)?;
        self.from_commit(&commit)
    }

    /// Manifest at `from` narrowed to the applications changed relative to `to`.
    ///
    /// The diff runs from the `to` tree to the `from` tree, so its new side is
    /// the revision the manifest describes.
    pub fn by_revision_range(&self, from: &str, to: &str) -> Result<Manifest> {
        let from_commit = self.repo.resolve_reference(from)?;
        let from_tree = self.repo.commit_tree(&from_commit)?;
        let manifest = self.from_tree(&from_commit, &from_tree)?;

        let to_tree = self.branch_tree(to)?;
        debug!("Diffing {} ({}) against {} ({})", from, from_tree.id, to, to_tree.id);

        let deltas = self.repo.diff_tree_to_tree(&to_tree, &from_tree)?;
        let reduced = reduce(&manifest, deltas)?;

        info!(
            "{} of {} application(s) changed between {} and {}",
            reduced.len(),
            manifest.len(),
            to,
            from
        );
        Ok(reduced)
    }

    fn branch_tree(&self, branch: &str) -> Result<Tree> {
        let commit = self.repo.resolve_reference(branch)?;
        self.repo.commit_tree(&commit)
    }

    fn from_commit(&self, commit: &Commit) -> Result<Manifest> {
        let tree = self.repo.commit_tree(commit)?;
        self.from_tree(commit, &tree)
    }

    fn from_tree(&self, commit: &Commit, tree: &Tree) -> Result<Manifest> {
        let applications = locate(self.repo.as_ref(), tree, &self.options.descriptor_name)?;
        info!(
            "Resolved {} application(s) at {}",
            applications.len(),
            commit.id
        );
        Ok(Manifest::assemble(
            self.repo.location(),
            commit.id.clone(),
            applications,
        ))
    }
}

/// Full manifest of the repository at `dir` on `branch`.
pub fn manifest_by_branch(dir: &str, branch: &str) -> Result<Manifest> {
    ManifestResolver::open(dir)?.by_branch(branch)
}

/// Full manifest of the repository at `dir` at commit `sha`.
pub fn manifest_by_sha(dir: &str, sha: &str) -> Result<Manifest> {
    ManifestResolver::open(dir)?.by_sha(sha)
}

/// Applications on `from` changed relative to `to` in the repository at `dir`.
pub fn manifest_by_revision_range(dir: &str, from: &str, to: &str) -> Result<Manifest> {
    ManifestResolver::open(dir)?.by_revision_range(from, to)
}
