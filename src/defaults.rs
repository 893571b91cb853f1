//! Default values for appspec.
//!
//! This module provides centralized default values used by the library and
//! the CLI, ensuring consistency and avoiding duplication.

/// File name that marks a directory as an application.
pub const DEFAULT_DESCRIPTOR_NAME: &str = "appspec.yaml";

/// Repository location used when none is given.
pub const DEFAULT_REPOSITORY: &str = ".";

/// Environment variable overriding the repository location.
pub const REPOSITORY_ENV: &str = "APPSPEC_REPO";

/// Environment variable overriding the descriptor file name.
pub const DESCRIPTOR_ENV: &str = "APPSPEC_DESCRIPTOR";
