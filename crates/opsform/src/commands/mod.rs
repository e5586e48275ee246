//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod config_cmd;
pub mod entities;
pub mod evaluate;
pub mod fill;
pub mod util;
pub mod validate;

use opsform_core::SchemaRegistry;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a schema-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    registry: &SchemaRegistry,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Entities => entities::list(registry, global),
        Command::Fields(args) => entities::fields(registry, &args, cfg, global),
        Command::Rules(args) => entities::rules(registry, &args, global),
        Command::Evaluate(args) => evaluate::handle(registry, &args, global),
        Command::Validate(args) => validate::handle(registry, &args, cfg, global),
        Command::Fill(args) => fill::handle(registry, &args, cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
