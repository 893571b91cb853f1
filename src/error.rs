//! # Error Handling
//!
//! This module defines the centralized error type for `appspec`. Every stage
//! of a manifest derivation maps to exactly one variant, so a caller can tell
//! from the error alone which step failed: opening the repository, resolving
//! a reference, looking up a commit or its tree, reading a descriptor blob,
//! parsing a descriptor, re-resolving an application directory, computing a
//! diff, or decoding a raw identifier.
//!
//! Derivation is fail-fast. No variant is ever recovered from inside the
//! library and no partially built manifest is returned alongside an error.

use thiserror::Error;

/// Main error type for appspec operations
#[derive(Error, Debug)]
pub enum Error {
    /// The location does not point at a readable git repository.
    #[error("Failed to open repository at {location}: {message}")]
    RepositoryOpen { location: String, message: String },

    /// A branch, tag, or other reference name could not be resolved to a commit.
    #[error("Failed to resolve reference '{reference}': {message}")]
    ReferenceResolution { reference: String, message: String },

    /// A commit identifier does not name a commit in the repository.
    #[error("Failed to look up commit {id}: {message}")]
    CommitLookup { id: String, message: String },

    /// The tree of a commit could not be retrieved or walked.
    #[error("Failed to retrieve tree {id}: {message}")]
    TreeRetrieval { id: String, message: String },

    /// A descriptor blob could not be read.
    #[error("Failed to retrieve blob {id}: {message}")]
    BlobRetrieval { id: String, message: String },

    /// A descriptor file is not valid YAML or is missing required fields.
    #[error("Invalid descriptor at {path}: {message}")]
    DescriptorParse { path: String, message: String },

    /// The directory holding a descriptor could not be re-resolved in its tree.
    #[error("Failed to look up directory entry '{path}': {message}")]
    DirectoryEntryLookup { path: String, message: String },

    /// The diff between two trees could not be computed or enumerated.
    #[error("Failed to compute diff {old} -> {new}: {message}")]
    DiffComputation {
        old: String,
        new: String,
        message: String,
    },

    /// A textual revision identifier is not valid hex of the expected width.
    #[error("Invalid revision identifier '{input}': {message}")]
    IdentifierDecode { input: String, message: String },

    /// The `git` binary could not be spawned or exited unexpectedly.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A manifest could not be rendered.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
