//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `appspec` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Context`](crate::cli::Context), calls into the `appspec` library, and
//!   prints the result to stdout.
//!
//! All commands are read-only.

pub mod branch;
pub mod names;
pub mod pr;
pub mod sha;

use anyhow::Result;

use appspec::manifest::Manifest;
use appspec::output::render_manifest;

use crate::cli::Context;

/// Print `manifest` in the configured format.
fn print_manifest(manifest: &Manifest, context: &Context) -> Result<()> {
    let rendered = render_manifest(manifest, context.format, &context.output)?;
    print!("{}", rendered);
    Ok(())
}
