//! `validate`: run an entity schema over a value set.

use serde::Serialize;
use tabled::Tabled;

use opsform_core::{ErrorMap, MessageCatalog, MessageKey, SchemaRegistry};

use crate::cli::{FormInputArgs, GlobalOpts, OutputFormat};
use crate::config::Config;
use crate::error::CliError;
use crate::messages::ConsoleCatalog;
use crate::output;

use super::util;

#[derive(Clone, Serialize, Tabled)]
pub(crate) struct FieldError {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Key")]
    pub key: MessageKey,
    #[tabled(rename = "Message")]
    pub message: String,
}

pub fn handle(
    registry: &SchemaRegistry,
    args: &FormInputArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let input = util::load_input(registry, args, global)?;
    let values = input.opened_values();
    let errors = input
        .schema
        .validate_with(&values, &input.context, &input.resolved_options());

    let catalog = ConsoleCatalog::new(cfg.messages.clone());
    report(&args.entity.to_string(), &errors, &catalog, global)
}

/// Print an error map and turn a non-empty one into `InvalidForm`.
pub(crate) fn report(
    entity: &str,
    errors: &ErrorMap,
    catalog: &ConsoleCatalog,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();
    let rows: Vec<FieldError> = errors
        .iter()
        .map(|(field, key)| FieldError {
            field: field.to_owned(),
            key: key.clone(),
            message: catalog.display(key),
        })
        .collect();

    if rows.is_empty() && matches!(format, OutputFormat::Table) {
        if !global.quiet {
            let color = output::should_color(&global.color_mode());
            eprintln!("{}", output::status_line(true, &format!("{entity} is valid"), color));
        }
        return Ok(());
    }

    let out = output::render_list(&format, &rows, FieldError::clone, |e| {
        format!("{}\t{}", e.field, e.key)
    });
    output::print_output(&out, global.quiet);

    if rows.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidForm {
            entity: entity.to_owned(),
            count: rows.len(),
        })
    }
}
