//! # Repository Access
//!
//! This module defines the interface the manifest engine consumes from a
//! version-control backend, together with the value types that cross it.
//!
//! ## Design
//!
//! The engine never talks to git directly. Everything it needs is expressed
//! by the **`RepositoryBackend`** trait: resolving references and commits,
//! retrieving a commit's tree, walking that tree, re-resolving a single entry
//! by path, reading blobs, and diffing two trees. The concrete implementation
//! used by the application is `crate::git::GitRepository`, which shells out
//! to the system `git` binary. In tests the trait is implemented by an
//! in-memory backend so failure paths can be simulated without touching the
//! filesystem.
//!
//! Tree walks and diffs are exposed as lazy iterators of `Result` items
//! rather than visitor callbacks. Each iterator is finite and cannot be
//! restarted; walking again means asking the backend for a new one.
//!
//! ## Identifiers
//!
//! **`ObjectId`** is the hex codec for content identifiers. Its width is
//! fixed by the repository's **`ObjectFormat`**: 20 bytes for SHA-1
//! repositories and 32 bytes for SHA-256 ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hash function a repository uses to address its objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectFormat {
    /// 20-byte identifiers (the git default).
    #[default]
    Sha1,
    /// 32-byte identifiers.
    Sha256,
}

impl ObjectFormat {
    /// Parse the name git reports for an object format.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "sha1" => Some(ObjectFormat::Sha1),
            "sha256" => Some(ObjectFormat::Sha256),
            _ => None,
        }
    }

    /// Raw identifier width in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            ObjectFormat::Sha1 => 20,
            ObjectFormat::Sha256 => 32,
        }
    }

    /// Identifier width in hex characters.
    pub fn hex_len(self) -> usize {
        self.byte_len() * 2
    }
}

/// A content identifier, stored as lower-case hex.
///
/// Values are only constructed through [`ObjectId::from_hex`], so the hex
/// is always well formed and of a width valid for some [`ObjectFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Decode a textual identifier for a repository using `format`.
    ///
    /// Fails with [`Error::IdentifierDecode`] when the input is not hex or
    /// does not decode to exactly `format.byte_len()` bytes.
    pub fn from_hex(input: &str, format: ObjectFormat) -> Result<Self> {
        let bytes = hex::decode(input).map_err(|e| Error::IdentifierDecode {
            input: input.to_string(),
            message: e.to_string(),
        })?;

        if bytes.len() != format.byte_len() {
            return Err(Error::IdentifierDecode {
                input: input.to_string(),
                message: format!(
                    "expected {} hex characters, got {}",
                    format.hex_len(),
                    input.len()
                ),
            });
        }

        Ok(ObjectId(hex::encode(bytes)))
    }

    /// The identifier as lower-case hex.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: ObjectId,
}

/// A tree (directory snapshot) at some revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub id: ObjectId,
}

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// File content.
    Blob,
    /// A subdirectory.
    Tree,
    /// A submodule commit.
    Commit,
}

impl EntryKind {
    /// Parse the object type name git prints in tree listings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "blob" => Some(EntryKind::Blob),
            "tree" => Some(EntryKind::Tree),
            "commit" => Some(EntryKind::Commit),
            _ => None,
        }
    }
}

/// One entry produced by a tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Containing directory with its trailing `/`, or empty at the tree root.
    pub root: String,
    /// Final path component.
    pub name: String,
    pub kind: EntryKind,
    pub id: ObjectId,
}

impl TreeEntry {
    /// Build an entry from its full slash-separated path.
    pub fn from_path(path: &str, kind: EntryKind, id: ObjectId) -> Self {
        let (root, name) = match path.rfind('/') {
            Some(idx) => (&path[..=idx], &path[idx + 1..]),
            None => ("", path),
        };
        TreeEntry {
            root: root.to_string(),
            name: name.to_string(),
            kind,
            id,
        }
    }

    /// Full path of the entry relative to the tree root.
    pub fn path(&self) -> String {
        format!("{}{}", self.root, self.name)
    }
}

/// Kind of change a diff delta records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    TypeChange,
    Unmerged,
    Unknown,
}

impl DeltaStatus {
    /// Parse the status letter printed by `git diff-tree --name-status`.
    ///
    /// Rename and copy statuses carry a similarity score (`R086`); only the
    /// leading letter is significant.
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('A') => DeltaStatus::Added,
            Some('D') => DeltaStatus::Deleted,
            Some('M') => DeltaStatus::Modified,
            Some('R') => DeltaStatus::Renamed,
            Some('C') => DeltaStatus::Copied,
            Some('T') => DeltaStatus::TypeChange,
            Some('U') => DeltaStatus::Unmerged,
            _ => DeltaStatus::Unknown,
        }
    }
}

/// One changed file between two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffDelta {
    pub status: DeltaStatus,
    pub old_path: String,
    /// Path on the new side. Deletions report the removed path here too.
    pub new_path: String,
}

impl DiffDelta {
    /// A delta whose old and new side share one path.
    pub fn at(status: DeltaStatus, path: &str) -> Self {
        DiffDelta {
            status,
            old_path: path.to_string(),
            new_path: path.to_string(),
        }
    }
}

/// Lazy pre-order walk over every entry of a tree.
pub type TreeWalk<'a> = Box<dyn Iterator<Item = Result<TreeEntry>> + 'a>;

/// Lazy enumeration of the deltas between two trees.
pub type DiffDeltas<'a> = Box<dyn Iterator<Item = Result<DiffDelta>> + 'a>;

/// The operations the manifest engine needs from a repository.
///
/// Implementations only read. Whether one handle may be used from several
/// threads is up to the implementation.
pub trait RepositoryBackend {
    /// Location the repository was opened from, reported verbatim in manifests.
    fn location(&self) -> &str;

    /// Identifier format of this repository.
    fn object_format(&self) -> ObjectFormat;

    /// Resolve a branch, tag, fully qualified ref, or identifier to a commit.
    fn resolve_reference(&self, name: &str) -> Result<Commit>;

    /// Look up a commit by identifier.
    fn lookup_commit(&self, id: &ObjectId) -> Result<Commit>;

    /// The root tree of a commit.
    fn commit_tree(&self, commit: &Commit) -> Result<Tree>;

    /// Walk every entry of `tree`, at any depth, parents before children.
    fn walk<'a>(&'a self, tree: &Tree) -> Result<TreeWalk<'a>>;

    /// Look up a single entry of `tree` by its full path.
    fn entry_by_path(&self, tree: &Tree, path: &str) -> Result<TreeEntry>;

    /// Read the contents of a blob.
    fn lookup_blob(&self, id: &ObjectId) -> Result<Vec<u8>>;

    /// Enumerate the files that differ from `old` to `new`.
    fn diff_tree_to_tree<'a>(&'a self, old: &Tree, new: &Tree) -> Result<DiffDeltas<'a>>;
}
