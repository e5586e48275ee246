//! Schema inspection: entity list, field tables, rule tables.

use serde::Serialize;
use tabled::Tabled;

use opsform_core::{
    ConditionalRule, Constraint, EntityKind, FieldDescriptor, MessageCatalog, SchemaRegistry,
    Subject,
};

use crate::cli::{EntityArgs, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::messages::ConsoleCatalog;
use crate::output;

// ── Entities ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EntitySummary {
    entity: EntityKind,
    fields: usize,
    rules: usize,
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Rules")]
    rules: usize,
}

impl From<&EntitySummary> for EntityRow {
    fn from(s: &EntitySummary) -> Self {
        Self {
            entity: s.entity.to_string(),
            fields: s.fields,
            rules: s.rules,
        }
    }
}

pub fn list(registry: &SchemaRegistry, global: &GlobalOpts) -> Result<(), CliError> {
    let mut summaries = Vec::with_capacity(registry.len());
    for kind in registry.kinds() {
        let schema = registry.require(kind)?;
        summaries.push(EntitySummary {
            entity: kind,
            fields: schema.descriptors().len(),
            rules: schema.rules().len(),
        });
    }

    let out = output::render_list(
        &global.format(),
        &summaries,
        |s| EntityRow::from(s),
        |s| s.entity.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Fields ──────────────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Options")]
    options: String,
    #[tabled(rename = "Constraints")]
    constraints: String,
}

impl FieldRow {
    fn new(d: &FieldDescriptor, catalog: &ConsoleCatalog) -> Self {
        Self {
            name: d.name.clone(),
            kind: d.kind.to_string(),
            label: catalog.display(&d.label),
            required: if d.default_required { "yes" } else { "" }.into(),
            default: d.default.as_ref().map(ToString::to_string).unwrap_or_default(),
            options: d
                .options
                .iter()
                .map(|o| o.value.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            constraints: d
                .constraints
                .iter()
                .map(describe_constraint)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

fn describe_constraint(c: &Constraint) -> String {
    let bounds = |min: Option<String>, max: Option<String>| match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo}..{hi}"),
        (Some(lo), None) => format!(">= {lo}"),
        (None, Some(hi)) => format!("<= {hi}"),
        (None, None) => "any".into(),
    };
    match c {
        Constraint::Length { min, max } => format!(
            "length {}",
            bounds(min.map(|v| v.to_string()), max.map(|v| v.to_string()))
        ),
        Constraint::Range { min, max } => format!(
            "range {}",
            bounds(min.map(|v| v.to_string()), max.map(|v| v.to_string()))
        ),
        Constraint::Integer => "integer".into(),
        Constraint::Format { format } => format.to_string(),
        Constraint::Pattern { pattern, .. } => format!("pattern /{pattern}/"),
        Constraint::NotBeforeToday => "not before today".into(),
        Constraint::OrderedRange => "ordered range".into(),
    }
}

pub fn fields(
    registry: &SchemaRegistry,
    args: &EntityArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let schema = registry.require(args.entity)?;
    let catalog = ConsoleCatalog::new(cfg.messages.clone());

    let out = output::render_list(
        &global.format(),
        schema.descriptors(),
        |d| FieldRow::new(d, &catalog),
        |d| d.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Rules ───────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct RuleView {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Condition")]
    condition: String,
    #[tabled(rename = "Effect")]
    effect: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl RuleView {
    fn new(index: usize, rule: &ConditionalRule) -> Self {
        Self {
            index,
            when: match &rule.when {
                Subject::Field(name) => name.clone(),
                Subject::Flag(name) => format!("@{name}"),
            },
            condition: rule.predicate.to_string(),
            effect: rule.effect.to_string(),
            target: rule.target.clone(),
        }
    }
}

pub fn rules(
    registry: &SchemaRegistry,
    args: &EntityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let schema = registry.require(args.entity)?;
    let views: Vec<RuleView> = schema
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleView::new(i + 1, rule))
        .collect();

    let out = output::render_list(
        &global.format(),
        &views,
        RuleView::clone,
        ToString::to_string,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

impl std::fmt::Display for RuleView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "when {} {} then {} {}",
            self.when, self.condition, self.effect, self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsform_core::Format;

    #[test]
    fn constraint_summaries() {
        assert_eq!(describe_constraint(&Constraint::length(8, 63)), "length 8..63");
        assert_eq!(describe_constraint(&Constraint::min(1.0)), "range >= 1");
        assert_eq!(describe_constraint(&Constraint::format(Format::Mac)), "mac");
    }
}
