//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use appspec::defaults::{
    DEFAULT_DESCRIPTOR_NAME, DEFAULT_REPOSITORY, DESCRIPTOR_ENV, REPOSITORY_ENV,
};
use appspec::output::{OutputConfig, OutputFormat};
use appspec::resolver::{ManifestResolver, ResolveOptions};
use appspec::suggestions;

use crate::commands;

/// Appspec - Resolve the deployable applications of a git repository
#[derive(Parser, Debug)]
#[command(name = "appspec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Repository to read.
    #[arg(long, global = true, value_name = "DIR", env = REPOSITORY_ENV, default_value = DEFAULT_REPOSITORY)]
    repo: String,

    /// File name that marks an application directory.
    #[arg(long, global = true, value_name = "NAME", env = DESCRIPTOR_ENV, default_value = DEFAULT_DESCRIPTOR_NAME)]
    descriptor: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "yaml")]
    format: OutputFormat,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the manifest at a branch, tag, or ref
    Branch(commands::branch::BranchArgs),

    /// Print the manifest at a full commit hash
    Sha(commands::sha::ShaArgs),

    /// Print the applications a branch changes relative to another
    Pr(commands::pr::PrArgs),

    /// Print the applications at a branch indexed by name
    Names(commands::names::NamesArgs),
}

/// Settings shared by every command.
pub struct Context {
    pub format: OutputFormat,
    pub output: OutputConfig,
    repo: String,
    options: ResolveOptions,
}

impl Context {
    /// Open the configured repository.
    pub fn resolver(&self) -> Result<ManifestResolver> {
        ManifestResolver::open_with_options(&self.repo, self.options.clone())
            .map_err(suggestions::explain)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let context = Context {
            format: self.format,
            output: OutputConfig::from_env_and_flag(&self.color),
            repo: self.repo,
            options: ResolveOptions {
                descriptor_name: self.descriptor,
            },
        };

        match self.command {
            Commands::Branch(args) => commands::branch::execute(args, &context),
            Commands::Sha(args) => commands::sha::execute(args, &context),
            Commands::Pr(args) => commands::pr::execute(args, &context),
            Commands::Names(args) => commands::names::execute(args, &context),
        }
    }
}

/// Log to stderr at `level` unless `RUST_LOG` says otherwise.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
