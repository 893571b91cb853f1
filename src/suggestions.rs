//! # Error Suggestions
//!
//! Helpers that turn library errors into CLI messages with hints. Following
//! CLI recommendations, errors should tell users what went wrong AND how to
//! fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use appspec::suggestions;
//!
//! let manifest = resolver.by_branch(&branch).map_err(suggestions::explain)?;
//! ```

use crate::defaults::{DESCRIPTOR_ENV, REPOSITORY_ENV};
use crate::error::Error;

/// Wrap `error` with hints for the failures users can fix themselves.
pub fn explain(error: Error) -> anyhow::Error {
    match &error {
        Error::RepositoryOpen { location, .. } => repository_not_found(location, &error),
        Error::ReferenceResolution { reference, .. } => unknown_reference(reference, &error),
        Error::IdentifierDecode { input, .. } => invalid_identifier(input, &error),
        Error::DescriptorParse { path, .. } => invalid_descriptor(path, &error),
        Error::DirectoryEntryLookup { path, .. } => unresolvable_directory(path, &error),
        _ => anyhow::Error::new(error),
    }
}

/// Generate an error for a location that is not a git repository.
pub fn repository_not_found(location: &str, error: &Error) -> anyhow::Error {
    anyhow::anyhow!(
        "{error}\n\n\
         hint: Run the command from inside a git repository\n\
         hint: Use --repo to point at a repository (currently '{location}')\n\
         hint: Set the {REPOSITORY_ENV} environment variable"
    )
}

/// Generate an error for a branch or ref that does not exist.
pub fn unknown_reference(reference: &str, error: &Error) -> anyhow::Error {
    anyhow::anyhow!(
        "{error}\n\n\
         hint: Check the spelling of '{reference}' with 'git branch --all'\n\
         hint: Remote branches need their remote prefix (e.g., 'origin/{reference}')"
    )
}

/// Generate an error for a malformed commit identifier.
pub fn invalid_identifier(input: &str, error: &Error) -> anyhow::Error {
    let hint = if input.chars().all(|c| c.is_ascii_hexdigit()) {
        "hint: Abbreviated identifiers are not accepted; pass the full commit hash"
    } else {
        "hint: Commit identifiers are hexadecimal; use 'appspec branch' for names"
    };
    anyhow::anyhow!(
        "{error}\n\n\
         {hint}\n\
         hint: 'git rev-parse <rev>' prints the full hash of any revision"
    )
}

/// Generate an error for a descriptor that could not be parsed.
pub fn invalid_descriptor(path: &str, error: &Error) -> anyhow::Error {
    anyhow::anyhow!(
        "{error}\n\n\
         hint: Every descriptor must be a YAML mapping with a non-empty 'name'\n\
         hint: Fix the descriptor in '{path}' and commit the change\n\
         hint: Use --descriptor or {DESCRIPTOR_ENV} if your descriptors use another file name"
    )
}

/// Generate an error for an application directory that has no tree entry.
pub fn unresolvable_directory(path: &str, error: &Error) -> anyhow::Error {
    if path.is_empty() {
        return anyhow::anyhow!(
            "{error}\n\n\
             hint: A descriptor at the repository root is not supported; the root has no directory entry to version\n\
             hint: Move the root descriptor into the application's own directory"
        );
    }
    anyhow::anyhow!(
        "{error}\n\n\
         hint: Application directories are versioned by their tree entry; '{path}' could not be looked up\n\
         hint: Rename directories whose names are not valid UTF-8"
    )
}
