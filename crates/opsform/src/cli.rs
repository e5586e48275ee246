//! Clap derive structures for the `opsform` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use opsform_core::EntityKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// opsform -- inspect, evaluate and fill admin console entity dialogs
#[derive(Debug, Parser)]
#[command(
    name = "opsform",
    version,
    about = "Evaluate and validate network admin entity forms from the command line",
    long_about = "Drives the declarative form engine behind the admin console's entity dialogs.\n\n\
        Lists entity schemas and their conditional rules, evaluates which fields are\n\
        required or reset for a given value set, validates values, and fills a dialog\n\
        interactively.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Current site id (scopes lookups and the `siteId` rule flag)
    #[arg(long, short = 's', env = "OPSFORM_SITE", global = true)]
    pub site: Option<String>,

    /// Current region id
    #[arg(long, env = "OPSFORM_REGION", global = true)]
    pub region: Option<String>,

    /// Override today's date (YYYY-MM-DD) for date checks
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "OPSFORM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered entity kinds
    #[command(alias = "ls")]
    Entities,

    /// Show an entity's field descriptors
    #[command(alias = "f")]
    Fields(EntityArgs),

    /// Show an entity's conditional rules
    #[command(alias = "r")]
    Rules(EntityArgs),

    /// Compute required/visible state and pending resets for a value set
    #[command(alias = "eval")]
    Evaluate(FormInputArgs),

    /// Validate a value set against an entity schema
    #[command(alias = "check")]
    Validate(FormInputArgs),

    /// Fill an entity dialog interactively
    Fill(FillArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EntityArgs {
    /// Entity kind (e.g. portal, voucher, ssid)
    pub entity: EntityKind,
}

/// Where a command's values and lookup feeds come from.
#[derive(Debug, Args)]
pub struct FormInputArgs {
    /// Entity kind (e.g. portal, voucher, ssid)
    pub entity: EntityKind,

    /// Read values from a JSON object file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,

    /// Set a field value (name=value; value parsed as JSON, else text)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Options for a dynamic field from a JSON file (field=path.json)
    #[arg(long = "lookup", value_name = "FIELD=PATH")]
    pub lookup: Vec<String>,

    /// Evaluate in edit mode (values are an existing record)
    #[arg(long)]
    pub edit: bool,
}

#[derive(Debug, Args)]
pub struct FillArgs {
    #[command(flatten)]
    pub input: FormInputArgs,

    /// Write the accepted values to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Don't prompt; submit the provided values as they are
    #[arg(long)]
    pub no_input: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "defaults.output" or "messages.validation.required")
        key: String,

        /// Value to set
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
