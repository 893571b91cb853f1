//! # Pr Command Implementation
//!
//! This module implements the `pr` subcommand, which prints the applications
//! at `FROM` whose directories contain changes that `FROM` introduces
//! relative to `TO`. This is the set a pull request from `FROM` into `TO`
//! would need to build and deploy.
//!
//! The printed manifest carries the commit of `FROM`.

use anyhow::Result;
use clap::Args;

use appspec::suggestions;

use crate::cli::Context;

/// Print the applications a branch changes relative to another
#[derive(Args, Debug)]
pub struct PrArgs {
    /// Branch carrying the changes.
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Branch the changes are compared against.
    #[arg(value_name = "TO")]
    pub to: String,
}

/// Execute the `pr` command.
pub fn execute(args: PrArgs, context: &Context) -> Result<()> {
    let manifest = context
        .resolver()?
        .by_revision_range(&args.from, &args.to)
        .map_err(suggestions::explain)?;
    super::print_manifest(&manifest, context)
}
