//! Git backend built on the system `git` binary.
//!
//! Every operation runs a plumbing command (`rev-parse`, `cat-file`,
//! `ls-tree`, `diff-tree`) against the repository with `git -C <location>`
//! and parses its machine-readable output. Listings are requested with `-z`
//! so paths are never quoted or escaped.

use std::path::Path;
use std::process::{Command, Output};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::repository::{
    Commit, DeltaStatus, DiffDelta, DiffDeltas, EntryKind, ObjectFormat, ObjectId,
    RepositoryBackend, Tree, TreeEntry, TreeWalk,
};

/// Open the repository at `location`.
///
/// The location may be a working tree or a bare repository.
pub fn open_repository(location: &str) -> Result<GitRepository> {
    GitRepository::open(location)
}

/// A handle on a local git repository.
///
/// The handle only holds the location and object format; each operation
/// spawns its own `git` process, so dropping the handle releases nothing
/// beyond memory.
#[derive(Debug, Clone)]
pub struct GitRepository {
    location: String,
    format: ObjectFormat,
}

impl GitRepository {
    /// Open the repository at `location`, detecting its object format.
    pub fn open(location: &str) -> Result<Self> {
        if !Path::new(location).is_dir() {
            return Err(Error::RepositoryOpen {
                location: location.to_string(),
                message: "directory does not exist".to_string(),
            });
        }

        let output = run_git(location, &["rev-parse", "--git-dir"])?;
        if !output.status.success() {
            return Err(Error::RepositoryOpen {
                location: location.to_string(),
                message: stderr_of(&output),
            });
        }

        // Older git versions echo the unknown flag back; treat that as SHA-1.
        let output = run_git(location, &["rev-parse", "--show-object-format"])?;
        let format = if output.status.success() {
            ObjectFormat::from_name(&String::from_utf8_lossy(&output.stdout)).unwrap_or_default()
        } else {
            ObjectFormat::Sha1
        };

        debug!("Opened repository {} ({:?})", location, format);

        Ok(GitRepository {
            location: location.to_string(),
            format,
        })
    }

    /// Run `git` in this repository.
    fn git(&self, args: &[&str]) -> Result<Output> {
        run_git(&self.location, args)
    }

    /// Parse a single identifier printed by git on stdout.
    fn parse_id(&self, output: &Output) -> Result<ObjectId> {
        let text = String::from_utf8_lossy(&output.stdout);
        ObjectId::from_hex(text.trim(), self.format)
    }

    /// Resolve `spec` to a commit id with `rev-parse --verify`.
    fn rev_parse_commit(&self, spec: &str) -> std::result::Result<ObjectId, String> {
        let peeled = format!("{}^{{commit}}", spec);
        let output = self
            .git(&["rev-parse", "--verify", "--quiet", &peeled])
            .map_err(|e| e.to_string())?;
        if !output.status.success() {
            return Err(non_empty_or(stderr_of(&output), "unknown revision"));
        }
        self.parse_id(&output).map_err(|e| e.to_string())
    }
}

impl RepositoryBackend for GitRepository {
    fn location(&self) -> &str {
        &self.location
    }

    fn object_format(&self) -> ObjectFormat {
        self.format
    }

    fn resolve_reference(&self, name: &str) -> Result<Commit> {
        // Keep names from being read as rev-parse options.
        if name.is_empty() || name.starts_with('-') {
            return Err(Error::ReferenceResolution {
                reference: name.to_string(),
                message: "not a valid reference name".to_string(),
            });
        }

        let id = self
            .rev_parse_commit(name)
            .map_err(|message| Error::ReferenceResolution {
                reference: name.to_string(),
                message,
            })?;
        trace!("Resolved {} to {}", name, id);
        Ok(Commit { id })
    }

    fn lookup_commit(&self, id: &ObjectId) -> Result<Commit> {
        let output = self.git(&["cat-file", "-t", id.as_str()])?;
        if !output.status.success() {
            return Err(Error::CommitLookup {
                id: id.to_string(),
                message: non_empty_or(stderr_of(&output), "object not found"),
            });
        }

        let kind = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if kind != "commit" {
            return Err(Error::CommitLookup {
                id: id.to_string(),
                message: format!("object is a {}, not a commit", kind),
            });
        }

        Ok(Commit { id: id.clone() })
    }

    fn commit_tree(&self, commit: &Commit) -> Result<Tree> {
        let spec = format!("{}^{{tree}}", commit.id);
        let output = self.git(&["rev-parse", "--verify", "--quiet", &spec])?;
        if !output.status.success() {
            return Err(Error::TreeRetrieval {
                id: commit.id.to_string(),
                message: non_empty_or(stderr_of(&output), "commit has no tree"),
            });
        }

        let id = self.parse_id(&output).map_err(|e| Error::TreeRetrieval {
            id: commit.id.to_string(),
            message: e.to_string(),
        })?;
        Ok(Tree { id })
    }

    fn walk<'a>(&'a self, tree: &Tree) -> Result<TreeWalk<'a>> {
        let output = self.git(&["ls-tree", "-r", "-t", "-z", "--full-tree", tree.id.as_str()])?;
        if !output.status.success() {
            return Err(Error::TreeRetrieval {
                id: tree.id.to_string(),
                message: stderr_of(&output),
            });
        }

        let tree_id = tree.id.to_string();
        let format = self.format;
        let records: Vec<String> = split_records(&output.stdout);
        Ok(Box::new(records.into_iter().map(move |record| {
            parse_ls_tree_record(&record, format).map_err(|message| Error::TreeRetrieval {
                id: tree_id.clone(),
                message,
            })
        })))
    }

    fn entry_by_path(&self, tree: &Tree, path: &str) -> Result<TreeEntry> {
        let lookup_error = |message: String| Error::DirectoryEntryLookup {
            path: path.to_string(),
            message,
        };

        if path.is_empty() {
            return Err(lookup_error("the tree root has no entry".to_string()));
        }

        let output = self.git(&["ls-tree", "-z", "--full-tree", tree.id.as_str(), "--", path])?;
        if !output.status.success() {
            return Err(lookup_error(stderr_of(&output)));
        }

        for record in split_records(&output.stdout) {
            let entry = parse_ls_tree_record(&record, self.format).map_err(lookup_error)?;
            if entry.path() == path {
                return Ok(entry);
            }
        }

        // Listings are decoded lossily; such a path cannot be looked up again.
        if path.contains(char::REPLACEMENT_CHARACTER) {
            return Err(lookup_error(
                "path is not valid UTF-8 and cannot be resolved".to_string(),
            ));
        }
        Err(lookup_error(format!("no entry in tree {}", tree.id)))
    }

    fn lookup_blob(&self, id: &ObjectId) -> Result<Vec<u8>> {
        let output = self.git(&["cat-file", "blob", id.as_str()])?;
        if !output.status.success() {
            return Err(Error::BlobRetrieval {
                id: id.to_string(),
                message: non_empty_or(stderr_of(&output), "blob not found"),
            });
        }
        Ok(output.stdout)
    }

    fn diff_tree_to_tree<'a>(&'a self, old: &Tree, new: &Tree) -> Result<DiffDeltas<'a>> {
        let output = self.git(&[
            "diff-tree",
            "-r",
            "-z",
            "--no-renames",
            "--name-status",
            old.id.as_str(),
            new.id.as_str(),
        ])?;
        let diff_error = |message: String| Error::DiffComputation {
            old: old.id.to_string(),
            new: new.id.to_string(),
            message,
        };

        if !output.status.success() {
            return Err(diff_error(stderr_of(&output)));
        }

        let records = split_records(&output.stdout);
        if records.len() % 2 != 0 {
            return Err(diff_error("truncated diff-tree output".to_string()));
        }

        let mut deltas = Vec::with_capacity(records.len() / 2);
        for pair in records.chunks(2) {
            deltas.push(DiffDelta::at(DeltaStatus::from_code(&pair[0]), &pair[1]));
        }
        debug!("Diff {} -> {}: {} file(s)", old.id, new.id, deltas.len());

        Ok(Box::new(deltas.into_iter().map(Ok)))
    }
}

/// Variables that point git at a repository other than the one `-C` selects.
const REPOSITORY_ENV_VARS: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_ALTERNATE_OBJECT_DIRECTORIES",
    "GIT_COMMON_DIR",
    "GIT_NAMESPACE",
];

/// Build `git -C <location> <args>`, isolated from the caller's repository
/// environment.
fn git_command(location: &str, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    for var in REPOSITORY_ENV_VARS {
        command.env_remove(var);
    }
    command
        .arg("-C")
        .arg(location)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GIT_LITERAL_PATHSPECS", "1");
    command
}

/// Spawn `git -C <location> <args>` and capture its output.
fn run_git(location: &str, args: &[&str]) -> Result<Output> {
    git_command(location, args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            stderr: e.to_string(),
        })
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Split NUL-terminated `-z` output into records.
fn split_records(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|b| *b == 0)
        .filter(|record| !record.is_empty())
        .map(|record| String::from_utf8_lossy(record).into_owned())
        .collect()
}

/// Parse one `ls-tree -z` record: `<mode> SP <type> SP <id> TAB <path>`.
fn parse_ls_tree_record(
    record: &str,
    format: ObjectFormat,
) -> std::result::Result<TreeEntry, String> {
    let (meta, path) = record
        .split_once('\t')
        .ok_or_else(|| format!("malformed ls-tree record: {}", record))?;

    let mut fields = meta.split(' ');
    let (_mode, kind, id) = match (fields.next(), fields.next(), fields.next()) {
        (Some(mode), Some(kind), Some(id)) => (mode, kind, id),
        _ => return Err(format!("malformed ls-tree record: {}", record)),
    };

    let kind = EntryKind::from_name(kind).ok_or_else(|| format!("unknown object type: {}", kind))?;
    let id = ObjectId::from_hex(id, format).map_err(|e| e.to_string())?;

    Ok(TreeEntry::from_path(path, kind, id))
}
