//! `fill`: drive one entity dialog from the terminal.
//!
//! Opens a form session, applies lookup feeds through the debounced
//! lookup path, prompts for every field that currently applies (later
//! prompts see the resets earlier answers caused), then submits. The
//! submitter writes the accepted snapshot to `--save` when given.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use owo_colors::OwoColorize;
use tabled::Tabled;
use tracing::{debug, warn};

use opsform_core::{
    FieldDescriptor, FieldKind, FieldValue, FormSession, MessageCatalog, SchemaRegistry,
    SessionContext, SubmitOutcome, SubmitResolution, Submitter, ValueSet, keys,
};

use crate::cli::{FillArgs, GlobalOpts};
use crate::config::Config;
use crate::error::{CliError, prompt_err};
use crate::messages::ConsoleCatalog;
use crate::output;

use super::util::{self, FormInput};
use super::validate;

// ── Submitter ───────────────────────────────────────────────────────

/// Persists accepted values as a JSON file, or just accepts them.
struct SnapshotWriter {
    path: Option<PathBuf>,
}

impl Submitter for SnapshotWriter {
    fn submit(
        &self,
        values: ValueSet,
        context: &SessionContext,
    ) -> impl Future<Output = SubmitOutcome> + Send {
        let path = self.path.clone();
        debug!(mode = %context.mode, fields = values.len(), "submitting snapshot");
        async move {
            let Some(path) = path else {
                return SubmitOutcome::accepted();
            };
            let body = output::render_json_pretty(&values);
            match tokio::fs::write(&path, body).await {
                Ok(()) => SubmitOutcome::accepted(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to write snapshot");
                    SubmitOutcome::failed(keys::SUBMIT_FAILED)
                }
            }
        }
    }
}

// ── Snapshot output ─────────────────────────────────────────────────

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// `--set` form of a value: text as is, everything else as JSON.
fn assignment_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

impl output::Document for ValueSet {
    fn table_text(&self) -> String {
        let rows: Vec<SnapshotRow> = self
            .iter()
            .map(|(name, value)| SnapshotRow {
                field: name.to_owned(),
                value: value.to_string(),
            })
            .collect();
        output::render_table(&rows)
    }

    /// One `name=value` line per field, accepted back by `--set`.
    fn plain_text(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}={}", assignment_text(value)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    registry: &SchemaRegistry,
    args: &FillArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let input = util::load_input(registry, &args.input, global)?;
    let entity = args.input.entity.to_string();
    let catalog = ConsoleCatalog::new(cfg.messages.clone());
    let color = output::should_color(&global.color_mode());

    let mut session = open(&input);
    apply_lookups(&mut session, &input, cfg.search_debounce()).await?;

    if !args.no_input {
        if let Err(e) = prompt_all(&mut session, &catalog, color) {
            session.close();
            return Err(e);
        }
    }

    let submitter = SnapshotWriter {
        path: args.save.clone(),
    };
    match session.submit(&submitter).await? {
        SubmitResolution::Accepted(values) => {
            if let Some(path) = &args.save {
                if !global.quiet {
                    let message = format!("{entity} saved to {}", path.display());
                    eprintln!("{}", output::status_line(true, &message, color));
                }
            } else {
                let out = output::render_document(&global.format(), &values);
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }
        SubmitResolution::Invalid(errors) => validate::report(&entity, &errors, &catalog, global),
        SubmitResolution::Rejected { errors, form_error } => {
            validate::report(&entity, &errors, &catalog, global)?;
            let key = form_error.unwrap_or(keys::SUBMIT_FAILED);
            Err(CliError::Validation {
                field: entity,
                reason: catalog.display(&key),
            })
        }
        SubmitResolution::Discarded => Ok(()),
    }
}

/// Open the dialog: edit mode takes the record wholesale, create mode
/// starts from defaults and applies each provided value in order so
/// reset cascades run as they would for a user typing.
fn open(input: &FormInput) -> FormSession {
    if input.context.is_edit() {
        return FormSession::edit(
            input.schema.clone(),
            input.context.clone(),
            &input.values,
        );
    }

    let mut session = FormSession::create(input.schema.clone(), input.context.clone());
    for (name, value) in input.values.iter() {
        if let Err(e) = session.set(name, value.clone()) {
            warn!(field = name, error = %e, "skipping provided value");
        }
    }
    session
}

async fn apply_lookups(
    session: &mut FormSession,
    input: &FormInput,
    debounce: Duration,
) -> Result<(), CliError> {
    for (field, lookup) in &input.lookups {
        let ticket = session.begin_lookup(field, "")?;
        if !ticket.debounce(debounce).await {
            continue;
        }
        if !session.apply_lookup(&ticket, lookup) {
            warn!(field = %field, "lookup result was discarded");
        }
    }
    Ok(())
}

// ── Prompts ─────────────────────────────────────────────────────────

fn prompt_all(
    session: &mut FormSession,
    catalog: &ConsoleCatalog,
    color: bool,
) -> Result<(), CliError> {
    let schema = session.schema().clone();

    for descriptor in schema.descriptors() {
        let name = descriptor.name.as_str();
        if descriptor.kind == FieldKind::CategoryHeading {
            let heading = catalog.display(&descriptor.label);
            if color {
                eprintln!("\n{}", heading.bold());
            } else {
                eprintln!("\n{heading}");
            }
            continue;
        }
        if !session.is_visible(name) {
            continue;
        }

        loop {
            // Options may have been narrowed by a lookup
            let resolved = session.descriptor(name).unwrap_or_else(|| descriptor.clone());
            let value = prompt_field(
                &resolved,
                session.value(name),
                session.is_required(name),
                catalog,
            )?;
            session.set(name, value)?;

            match session.blur(name)? {
                None => break,
                Some(key) => {
                    eprintln!("{}", output::status_line(false, &catalog.display(&key), color));
                }
            }
        }
    }
    Ok(())
}

fn prompt_field(
    descriptor: &FieldDescriptor,
    current: &FieldValue,
    required: bool,
    catalog: &ConsoleCatalog,
) -> Result<FieldValue, CliError> {
    let label = catalog.display(&descriptor.label);
    let prompt = if required { format!("{label} *") } else { label };
    let kind = descriptor.kind;

    match kind {
        FieldKind::Switch => Confirm::new()
            .with_prompt(prompt)
            .default(current.is_truthy())
            .interact()
            .map(FieldValue::Bool)
            .map_err(prompt_err),

        FieldKind::Password => {
            let entered = Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .map_err(prompt_err)?;
            // Blank keeps what the dialog already holds (edit mode secrets)
            Ok(if entered.is_empty() {
                current.clone()
            } else {
                FieldValue::Text(entered)
            })
        }

        _ if kind.is_choice() && !descriptor.options.is_empty() => {
            if kind.is_multi() {
                prompt_multi(descriptor, current, prompt, catalog)
            } else {
                prompt_select(descriptor, current, prompt, required, catalog)
            }
        }

        FieldKind::Number => prompt_text(prompt, current).map(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                FieldValue::Null
            } else {
                raw.parse::<f64>()
                    .map_or_else(|_| FieldValue::from(raw), FieldValue::Number)
            }
        }),

        FieldKind::MultiSelect | FieldKind::Checklist | FieldKind::DateRange => {
            prompt_text(prompt, current).map(|raw| {
                FieldValue::List(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(FieldValue::from)
                        .collect(),
                )
            })
        }

        _ => prompt_text(prompt, current).map(|raw| {
            if raw.trim().is_empty() {
                kind.empty_value()
            } else {
                FieldValue::Text(raw)
            }
        }),
    }
}

fn prompt_text(prompt: String, current: &FieldValue) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(current.to_string())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)
}

fn prompt_select(
    descriptor: &FieldDescriptor,
    current: &FieldValue,
    prompt: String,
    required: bool,
    catalog: &ConsoleCatalog,
) -> Result<FieldValue, CliError> {
    let offset = usize::from(!required);
    let mut items: Vec<String> = Vec::with_capacity(descriptor.options.len() + offset);
    if !required {
        items.push("(none)".into());
    }
    items.extend(descriptor.options.iter().map(|o| o.label.display(catalog)));

    let default = descriptor
        .options
        .iter()
        .position(|o| o.value.loose_eq(current))
        .map_or(0, |i| i + offset);

    let picked = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact()
        .map_err(prompt_err)?;

    Ok(picked
        .checked_sub(offset)
        .and_then(|i| descriptor.options.get(i))
        .map_or_else(|| descriptor.kind.empty_value(), |o| o.value.clone()))
}

fn prompt_multi(
    descriptor: &FieldDescriptor,
    current: &FieldValue,
    prompt: String,
    catalog: &ConsoleCatalog,
) -> Result<FieldValue, CliError> {
    let chosen = current.as_list().unwrap_or_default();
    let items: Vec<String> = descriptor
        .options
        .iter()
        .map(|o| o.label.display(catalog))
        .collect();
    let defaults: Vec<bool> = descriptor
        .options
        .iter()
        .map(|o| chosen.iter().any(|v| v.loose_eq(&o.value)))
        .collect();

    let picked = MultiSelect::new()
        .with_prompt(prompt)
        .items(&items)
        .defaults(&defaults)
        .interact()
        .map_err(prompt_err)?;

    Ok(FieldValue::List(
        picked
            .into_iter()
            .filter_map(|i| descriptor.options.get(i).map(|o| o.value.clone()))
            .collect(),
    ))
}
