//! # Branch Command Implementation
//!
//! This module implements the `branch` subcommand, which prints the full
//! manifest of the repository at a branch, tag, or any other reference git
//! can resolve (`main`, `v1.2.0`, `refs/remotes/origin/main`, `HEAD~3`).

use anyhow::Result;
use clap::Args;

use appspec::suggestions;

use crate::cli::Context;

/// Print the manifest at a branch, tag, or ref
#[derive(Args, Debug)]
pub struct BranchArgs {
    /// Branch, tag, or ref to resolve.
    #[arg(value_name = "BRANCH", default_value = "HEAD")]
    pub branch: String,
}

/// Execute the `branch` command.
pub fn execute(args: BranchArgs, context: &Context) -> Result<()> {
    let manifest = context
        .resolver()?
        .by_branch(&args.branch)
        .map_err(suggestions::explain)?;
    super::print_manifest(&manifest, context)
}
