//! Discovery of application descriptors in a tree.
//!
//! [`DescriptorLocator`] walks a tree and yields one [`VersionedApplication`]
//! for every blob named like the descriptor file, at any depth. For each
//! match it
//!
//! 1. reads the descriptor blob,
//! 2. builds the [`Application`] with the descriptor's directory as its path,
//! 3. re-resolves that directory in the tree and uses the directory's
//!    identifier as the version.
//!
//! The version is taken from the directory rather than from the descriptor
//! so that any change inside the application produces a new version.
//!
//! The first failure ends the walk: the locator yields that error and then
//! nothing more. [`locate`] collects the walk and so returns either every
//! application or an error.

use log::debug;

use crate::application::Application;
use crate::error::Result;
use crate::manifest::VersionedApplication;
use crate::repository::{EntryKind, RepositoryBackend, Tree, TreeEntry, TreeWalk};

/// Lazy iterator over the applications declared in a tree.
pub struct DescriptorLocator<'a> {
    repo: &'a dyn RepositoryBackend,
    tree: Tree,
    descriptor_name: &'a str,
    entries: TreeWalk<'a>,
    done: bool,
}

impl<'a> DescriptorLocator<'a> {
    /// Start walking `tree` for files named `descriptor_name`.
    pub fn new(
        repo: &'a dyn RepositoryBackend,
        tree: &Tree,
        descriptor_name: &'a str,
    ) -> Result<Self> {
        let entries = repo.walk(tree)?;
        Ok(Self {
            repo,
            tree: tree.clone(),
            descriptor_name,
            entries,
            done: false,
        })
    }

    fn is_descriptor(&self, entry: &TreeEntry) -> bool {
        entry.kind == EntryKind::Blob && entry.name == self.descriptor_name
    }

    fn versioned(&self, entry: &TreeEntry) -> Result<VersionedApplication> {
        let path = entry.root.trim_end_matches('/');
        let content = self.repo.lookup_blob(&entry.id)?;
        let application = Application::build(path, &content)?;
        let dir = self.repo.entry_by_path(&self.tree, path)?;

        debug!(
            "Found application '{}' at {} ({})",
            application.name, path, dir.id
        );
        Ok(VersionedApplication::new(application, dir.id))
    }
}

impl Iterator for DescriptorLocator<'_> {
    type Item = Result<VersionedApplication>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            if !self.is_descriptor(&entry) {
                continue;
            }

            let result = self.versioned(&entry);
            self.done = result.is_err();
            return Some(result);
        }
    }
}

/// Every application declared in `tree`, in walk order.
pub fn locate(
    repo: &dyn RepositoryBackend,
    tree: &Tree,
    descriptor_name: &str,
) -> Result<Vec<VersionedApplication>> {
    DescriptorLocator::new(repo, tree, descriptor_name)?.collect()
}
