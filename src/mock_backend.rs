//! In-memory `RepositoryBackend` for unit tests.
//!
//! Branches are built from `(path, content)` file lists. Blob and tree
//! identifiers are derived from content, so identical subtrees on two
//! branches share an identifier just as they would in git. Individual
//! backend operations can be made to fail to exercise error propagation.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::repository::{
    Commit, DeltaStatus, DiffDelta, DiffDeltas, EntryKind, ObjectFormat, ObjectId,
    RepositoryBackend, Tree, TreeEntry, TreeWalk,
};

/// Backend operation that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Walk,
    EntryLookup,
    Blob,
    Diff,
    DiffEnumeration,
}

#[derive(Default)]
pub struct MockRepository {
    branches: HashMap<String, ObjectId>,
    commits: HashMap<ObjectId, ObjectId>,
    trees: HashMap<ObjectId, Vec<TreeEntry>>,
    blobs: HashMap<ObjectId, Vec<u8>>,
    failures: HashSet<Stage>,
}

fn hashed_id(parts: &[&str]) -> ObjectId {
    let mut hex = String::new();
    for salt in 0..3u8 {
        let mut hasher = DefaultHasher::new();
        salt.hash(&mut hasher);
        parts.hash(&mut hasher);
        hex.push_str(&format!("{:016x}", hasher.finish()));
    }
    hex.truncate(ObjectFormat::Sha1.hex_len());
    ObjectId::from_hex(&hex, ObjectFormat::Sha1).unwrap()
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commit on `branch` whose tree holds exactly `files`.
    pub fn with_branch(mut self, branch: &str, files: &[(&str, &str)]) -> Self {
        let mut blobs: BTreeMap<String, ObjectId> = BTreeMap::new();
        let mut dirs: BTreeSet<String> = BTreeSet::new();

        for (path, content) in files {
            let id = hashed_id(&["blob", *content]);
            self.blobs.insert(id.clone(), content.as_bytes().to_vec());
            blobs.insert(path.to_string(), id);

            let mut dir = path.to_string();
            while let Some(idx) = dir.rfind('/') {
                dir.truncate(idx);
                dirs.insert(dir.clone());
            }
        }

        // Deepest directories first so children are hashed before parents.
        let mut dir_ids: BTreeMap<String, ObjectId> = BTreeMap::new();
        let mut ordered: Vec<&String> = dirs.iter().collect();
        ordered.sort_by_key(|d| std::cmp::Reverse(d.matches('/').count()));
        for dir in ordered {
            let id = Self::subtree_id(dir, &blobs, &dir_ids);
            dir_ids.insert(dir.clone(), id);
        }
        let root = Self::subtree_id("", &blobs, &dir_ids);

        let mut entries: Vec<TreeEntry> = dir_ids
            .iter()
            .map(|(path, id)| TreeEntry::from_path(path, EntryKind::Tree, id.clone()))
            .chain(
                blobs
                    .iter()
                    .map(|(path, id)| TreeEntry::from_path(path, EntryKind::Blob, id.clone())),
            )
            .collect();
        // Pre-order: a directory sorts before anything beneath it.
        entries.sort_by_key(|entry| entry.path());

        let commit = hashed_id(&["commit", branch, root.as_str()]);
        self.trees.insert(root.clone(), entries);
        self.commits.insert(commit.clone(), root);
        self.branches.insert(branch.to_string(), commit);
        self
    }

    pub fn failing(mut self, stage: Stage) -> Self {
        self.failures.insert(stage);
        self
    }

    pub fn branch_commit(&self, branch: &str) -> ObjectId {
        self.branches[branch].clone()
    }

    /// Identifier of `path` on `branch`, as a walk would report it.
    pub fn entry_id(&self, branch: &str, path: &str) -> ObjectId {
        let root = &self.commits[&self.branches[branch]];
        self.trees[root]
            .iter()
            .find(|entry| entry.path() == path)
            .map(|entry| entry.id.clone())
            .unwrap()
    }

    fn subtree_id(
        dir: &str,
        blobs: &BTreeMap<String, ObjectId>,
        dir_ids: &BTreeMap<String, ObjectId>,
    ) -> ObjectId {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };
        let is_child = |path: &str| {
            path.strip_prefix(&prefix)
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
        };

        let mut parts: Vec<&str> = vec!["tree"];
        for (path, id) in blobs.iter().chain(dir_ids.iter()) {
            if is_child(path.as_str()) {
                parts.push(&path[prefix.len()..]);
                parts.push(id.as_str());
            }
        }
        hashed_id(&parts)
    }

    fn fail(&self, stage: Stage) -> bool {
        self.failures.contains(&stage)
    }

    fn files(&self, tree: &Tree) -> Result<BTreeMap<String, ObjectId>> {
        let entries = self.trees.get(&tree.id).ok_or_else(|| Error::TreeRetrieval {
            id: tree.id.to_string(),
            message: "unknown tree".to_string(),
        })?;
        Ok(entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Blob)
            .map(|entry| (entry.path(), entry.id.clone()))
            .collect())
    }
}

impl RepositoryBackend for MockRepository {
    fn location(&self) -> &str {
        "/mock/repo"
    }

    fn object_format(&self) -> ObjectFormat {
        ObjectFormat::Sha1
    }

    fn resolve_reference(&self, name: &str) -> Result<Commit> {
        self.branches
            .get(name)
            .map(|id| Commit { id: id.clone() })
            .ok_or_else(|| Error::ReferenceResolution {
                reference: name.to_string(),
                message: "unknown revision".to_string(),
            })
    }

    fn lookup_commit(&self, id: &ObjectId) -> Result<Commit> {
        if self.commits.contains_key(id) {
            Ok(Commit { id: id.clone() })
        } else {
            Err(Error::CommitLookup {
                id: id.to_string(),
                message: "object not found".to_string(),
            })
        }
    }

    fn commit_tree(&self, commit: &Commit) -> Result<Tree> {
        self.commits
            .get(&commit.id)
            .map(|id| Tree { id: id.clone() })
            .ok_or_else(|| Error::TreeRetrieval {
                id: commit.id.to_string(),
                message: "commit has no tree".to_string(),
            })
    }

    fn walk<'a>(&'a self, tree: &Tree) -> Result<TreeWalk<'a>> {
        if self.fail(Stage::Walk) {
            return Err(Error::TreeRetrieval {
                id: tree.id.to_string(),
                message: "walk failed".to_string(),
            });
        }
        let entries = self.trees.get(&tree.id).ok_or_else(|| Error::TreeRetrieval {
            id: tree.id.to_string(),
            message: "unknown tree".to_string(),
        })?;
        Ok(Box::new(entries.iter().cloned().map(Ok)))
    }

    fn entry_by_path(&self, tree: &Tree, path: &str) -> Result<TreeEntry> {
        let lookup_error = |message: &str| Error::DirectoryEntryLookup {
            path: path.to_string(),
            message: message.to_string(),
        };
        if self.fail(Stage::EntryLookup) {
            return Err(lookup_error("lookup failed"));
        }
        self.trees
            .get(&tree.id)
            .and_then(|entries| entries.iter().find(|entry| entry.path() == path))
            .cloned()
            .ok_or_else(|| lookup_error("no such entry"))
    }

    fn lookup_blob(&self, id: &ObjectId) -> Result<Vec<u8>> {
        if self.fail(Stage::Blob) {
            return Err(Error::BlobRetrieval {
                id: id.to_string(),
                message: "blob read failed".to_string(),
            });
        }
        self.blobs.get(id).cloned().ok_or_else(|| Error::BlobRetrieval {
            id: id.to_string(),
            message: "blob not found".to_string(),
        })
    }

    fn diff_tree_to_tree<'a>(&'a self, old: &Tree, new: &Tree) -> Result<DiffDeltas<'a>> {
        let diff_error = |message: &str| Error::DiffComputation {
            old: old.id.to_string(),
            new: new.id.to_string(),
            message: message.to_string(),
        };
        if self.fail(Stage::Diff) {
            return Err(diff_error("diff failed"));
        }

        let old_files = self.files(old)?;
        let new_files = self.files(new)?;
        let paths: BTreeSet<&String> = old_files.keys().chain(new_files.keys()).collect();

        let mut deltas: Vec<Result<DiffDelta>> = Vec::new();
        for path in paths {
            let status = match (old_files.get(path), new_files.get(path)) {
                (None, Some(_)) => DeltaStatus::Added,
                (Some(_), None) => DeltaStatus::Deleted,
                (Some(a), Some(b)) if a != b => DeltaStatus::Modified,
                _ => continue,
            };
            deltas.push(Ok(DiffDelta::at(status, path)));
        }
        if self.fail(Stage::DiffEnumeration) {
            deltas.push(Err(diff_error("delta enumeration failed")));
        }

        Ok(Box::new(deltas.into_iter()))
    }
}
