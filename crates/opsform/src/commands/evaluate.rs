//! `evaluate`: required/visible state and pending resets for a value set.

use serde::Serialize;
use tabled::Tabled;

use opsform_core::{FieldValue, SchemaRegistry};

use crate::cli::{FormInputArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct FieldStateView {
    field: String,
    kind: String,
    required: bool,
    visible: bool,
    value: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_to: Option<FieldValue>,
}

#[derive(Tabled)]
struct FieldStateRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Visible")]
    visible: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Reset To")]
    reset_to: String,
}

impl From<&FieldStateView> for FieldStateRow {
    fn from(v: &FieldStateView) -> Self {
        let flag = |b: bool| if b { "yes" } else { "no" }.to_owned();
        Self {
            field: v.field.clone(),
            kind: v.kind.clone(),
            required: flag(v.required),
            visible: flag(v.visible),
            value: v.value.to_string(),
            reset_to: v
                .reset_to
                .as_ref()
                .map(|r| match r {
                    FieldValue::Null => "(empty)".to_owned(),
                    other => other.to_string(),
                })
                .unwrap_or_default(),
        }
    }
}

pub fn handle(
    registry: &SchemaRegistry,
    args: &FormInputArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let input = util::load_input(registry, args, global)?;
    let values = input.opened_values();
    let evaluation = input.schema.evaluate(&values, &input.context);

    let views: Vec<FieldStateView> = input
        .schema
        .descriptors()
        .iter()
        .filter_map(|d| {
            let state = evaluation.state(&d.name)?;
            Some(FieldStateView {
                field: d.name.clone(),
                kind: d.kind.to_string(),
                required: state.required,
                visible: state.visible,
                value: values.value(&d.name).clone(),
                reset_to: evaluation.resets.get(&d.name).cloned(),
            })
        })
        .collect();

    tracing::debug!(
        entity = %args.entity,
        fields = views.len(),
        resets = evaluation.resets.len(),
        "evaluated"
    );

    let out = output::render_list(
        &global.format(),
        &views,
        |v| FieldStateRow::from(v),
        |v| {
            let mut flags = Vec::new();
            if v.required {
                flags.push("required");
            }
            if !v.visible {
                flags.push("hidden");
            }
            format!("{} {}", v.field, flags.join(","))
                .trim_end()
                .to_owned()
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
