//! # Sha Command Implementation
//!
//! This module implements the `sha` subcommand, which prints the full
//! manifest at a commit given by its complete hexadecimal hash. No
//! reference lookup takes place; abbreviated hashes are rejected.

use anyhow::Result;
use clap::Args;

use appspec::suggestions;

use crate::cli::Context;

/// Print the manifest at a full commit hash
#[derive(Args, Debug)]
pub struct ShaArgs {
    /// Full commit hash.
    #[arg(value_name = "SHA")]
    pub sha: String,
}

/// Execute the `sha` command.
pub fn execute(args: ShaArgs, context: &Context) -> Result<()> {
    let manifest = context
        .resolver()?
        .by_sha(&args.sha)
        .map_err(suggestions::explain)?;
    super::print_manifest(&manifest, context)
}
