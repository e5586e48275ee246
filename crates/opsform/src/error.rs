//! CLI error types with miette diagnostics.
//!
//! Maps core, session and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use opsform_config::ConfigError;
use opsform_core::{SchemaError, SessionError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const SCHEMA: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Form outcome ─────────────────────────────────────────────────

    #[error("{count} field(s) failed validation for {entity}")]
    #[diagnostic(
        code(opsform::invalid),
        help("Fix the listed fields, or run: opsform evaluate {entity} to see which fields apply")
    )]
    InvalidForm { entity: String, count: usize },

    // ── Engine ───────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(opsform::schema),
        help("The entity's field or rule table is inconsistent. Run: opsform rules <entity>")
    )]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    #[diagnostic(code(opsform::session))]
    Session(#[from] SessionError),

    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(opsform::validation))]
    Validation { field: String, reason: String },

    #[error("Unknown field '{field}' for {entity}")]
    #[diagnostic(
        code(opsform::unknown_field),
        help("Run: opsform fields {entity} to see available fields")
    )]
    UnknownField { entity: String, field: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(opsform::config),
        help("Check the config file, or run: opsform config path")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(code(opsform::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(opsform::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidForm { .. } => exit_code::INVALID,
            Self::Validation { .. } | Self::UnknownField { .. } | Self::Json(_) => exit_code::USAGE,
            Self::Config(_) | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::Schema(_) => exit_code::SCHEMA,
            Self::Session(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
