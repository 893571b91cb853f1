//! # Output Configuration
//!
//! This module controls how manifests are printed by the CLI: the output
//! format and whether colors are used.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Colors only apply to the `table` format. `yaml` and `json` output is
//! always plain so it can be piped into other tools.

use std::env;

use clap::ValueEnum;
use console::style;

use crate::error::{Error, Result};
use crate::manifest::Manifest;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// Anything else means auto: colors follow the terminal and the usual
    /// environment variables.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// `console` already honours `CLICOLOR`, `CLICOLOR_FORCE`, dumb
    /// terminals and non-TTY stdout; `NO_COLOR` is checked on top.
    fn detect_color_support() -> bool {
        env::var_os("NO_COLOR").is_none() && console::colors_enabled()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// How a manifest is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// YAML document
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// Aligned columns: path, name, version
    Table,
}

/// Render `manifest` in `format`.
pub fn render_manifest(
    manifest: &Manifest,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(manifest).map_err(|e| Error::Serialization {
            message: e.to_string(),
        }),
        OutputFormat::Json => serde_json::to_string_pretty(manifest)
            .map(|json| json + "\n")
            .map_err(|e| Error::Serialization {
                message: e.to_string(),
            }),
        OutputFormat::Table => Ok(render_table(manifest, config)),
    }
}

fn render_table(manifest: &Manifest, config: &OutputConfig) -> String {
    let mut out = format!("{} {}\n", paint(config, "commit", Paint::Dim), manifest.sha);

    if manifest.is_empty() {
        out.push_str("No applications found.\n");
        return out;
    }

    let path_width = manifest.paths().map(str::len).max().unwrap_or(0);
    let name_width = manifest
        .applications
        .iter()
        .map(|app| app.name().len())
        .max()
        .unwrap_or(0);

    for app in &manifest.applications {
        let path = format!("{:<width$}", app.path(), width = path_width);
        let name = format!("{:<width$}", app.name(), width = name_width);
        out.push_str(&format!(
            "{}  {}  {}\n",
            paint(config, &path, Paint::Strong),
            name,
            paint(config, app.version.as_str(), Paint::Dim)
        ));
    }
    out.push_str(&format!("\n{} application(s)\n", manifest.len()));
    out
}

/// Render the by-name index, sorted by name.
pub fn render_name_index(manifest: &Manifest, config: &OutputConfig) -> String {
    let index = manifest.index_by_name();
    let mut names: Vec<&str> = index.keys().copied().collect();
    names.sort_unstable();

    let mut out = String::new();
    for name in names {
        let app = index[name];
        out.push_str(&format!(
            "{} -> {} {}\n",
            paint(config, name, Paint::Strong),
            app.path(),
            paint(config, app.version.as_str(), Paint::Dim)
        ));
    }
    out
}

enum Paint {
    Strong,
    Dim,
}

fn paint(config: &OutputConfig, text: &str, paint: Paint) -> String {
    if !config.use_color {
        return text.to_string();
    }
    match paint {
        Paint::Strong => style(text).cyan().bold().force_styling(true).to_string(),
        Paint::Dim => style(text).dim().force_styling(true).to_string(),
    }
}
