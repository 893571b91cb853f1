//! # Names Command Implementation
//!
//! This module implements the `names` subcommand, which prints the
//! applications at a branch keyed by name, one `name -> path version` line
//! per distinct name, sorted by name. When two applications share a name the
//! one found last in the tree is shown.

use anyhow::Result;
use clap::Args;

use appspec::output::render_name_index;
use appspec::suggestions;

use crate::cli::Context;

/// Print the applications at a branch indexed by name
#[derive(Args, Debug)]
pub struct NamesArgs {
    /// Branch, tag, or ref to resolve.
    #[arg(value_name = "BRANCH", default_value = "HEAD")]
    pub branch: String,
}

/// Execute the `names` command.
pub fn execute(args: NamesArgs, context: &Context) -> Result<()> {
    let manifest = context
        .resolver()?
        .by_branch(&args.branch)
        .map_err(suggestions::explain)?;
    print!("{}", render_name_index(&manifest, &context.output));
    Ok(())
}
