//! Shared helpers for command handlers.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use opsform_core::{
    EntitySchema, FieldValue, LookupResult, ResolvedOptions, SchemaRegistry, SessionContext,
    ValueSet, project,
};

use crate::cli::{FormInputArgs, GlobalOpts};
use crate::error::CliError;

/// Everything a form command needs, assembled from flags and files.
pub struct FormInput {
    pub schema: Arc<EntitySchema>,
    pub context: SessionContext,
    /// Record loaded from `--from-file` plus `--set` overrides.
    pub values: ValueSet,
    pub lookups: IndexMap<String, LookupResult>,
}

impl FormInput {
    /// What a dialog opened on this input would hold: the record as-is in
    /// edit mode, create-mode defaults underneath it otherwise.
    pub fn opened_values(&self) -> ValueSet {
        if self.context.is_edit() {
            return self.values.clone();
        }
        let mut values = self.schema.initial_values();
        values.extend(self.values.clone());
        values
    }

    /// Project every lookup feed into option lists.
    pub fn resolved_options(&self) -> ResolvedOptions {
        self.lookups
            .iter()
            .map(|(field, lookup)| (field.clone(), project(lookup, &self.context)))
            .collect()
    }
}

pub fn load_input(
    registry: &SchemaRegistry,
    args: &FormInputArgs,
    global: &GlobalOpts,
) -> Result<FormInput, CliError> {
    let schema = registry.require(args.entity)?;
    let context = build_context(args.edit, global);

    let mut values = match &args.from_file {
        Some(path) => read_values_file(path)?,
        None => ValueSet::new(),
    };
    for assignment in &args.set {
        let (name, value) = parse_assignment(assignment)?;
        if schema.descriptor(&name).is_none() {
            tracing::warn!(entity = %args.entity, field = %name, "value for unknown field is passed through");
        }
        values.set(name, value);
    }

    let mut lookups = IndexMap::new();
    for entry in &args.lookup {
        let (field, path) = entry.split_once('=').ok_or_else(|| CliError::Validation {
            field: "lookup".into(),
            reason: format!("expected FIELD=PATH, got '{entry}'"),
        })?;
        if schema.descriptor(field).is_none() {
            return Err(CliError::UnknownField {
                entity: args.entity.to_string(),
                field: field.into(),
            });
        }
        lookups.insert(field.to_owned(), read_lookup_file(Path::new(path))?);
    }

    Ok(FormInput {
        schema,
        context,
        values,
        lookups,
    })
}

/// Session context from `--edit` and the global selection flags.
pub fn build_context(edit: bool, global: &GlobalOpts) -> SessionContext {
    let mut context = if edit {
        SessionContext::edit()
    } else {
        SessionContext::create()
    };
    if let Some(site) = &global.site {
        context = context.with_site(site.clone());
    }
    if let Some(region) = &global.region {
        context = context.with_region(region.clone());
    }
    if let Some(today) = global.today {
        context = context.with_today(today);
    }
    context
}

/// `name=value`, where value is JSON when it parses and text otherwise.
pub fn parse_assignment(raw: &str) -> Result<(String, FieldValue), CliError> {
    let (name, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: "set".into(),
        reason: format!("expected NAME=VALUE, got '{raw}'"),
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("missing field name in '{raw}'"),
        });
    }
    let value = serde_json::from_str::<Value>(value)
        .map_or_else(|_| FieldValue::from(value), FieldValue::from);
    Ok((name.to_owned(), value))
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

fn read_values_file(path: &Path) -> Result<ValueSet, CliError> {
    match read_json_file(path)? {
        Value::Object(record) => Ok(ValueSet::from_json_object(record)),
        other => Err(CliError::Validation {
            field: "from-file".into(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
    }
}

/// A bare array uses the default `label`/`value` projection; an object
/// spells out `records` and `projection`.
fn read_lookup_file(path: &Path) -> Result<LookupResult, CliError> {
    match read_json_file(path)? {
        Value::Array(records) => Ok(LookupResult::labeled(records)),
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        other => Err(CliError::Validation {
            field: "lookup".into(),
            reason: format!("expected a JSON array or object, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn assignment_values_parse_as_json_first() {
        let (name, value) = parse_assignment("authType=2").unwrap();
        assert_eq!(name, "authType");
        assert_eq!(value, FieldValue::Number(2.0));

        let (_, value) = parse_assignment(r#"ssidIds=["a","b"]"#).unwrap();
        assert_eq!(value, FieldValue::List(vec!["a".into(), "b".into()]));

        let (_, value) = parse_assignment("name=Lobby guests").unwrap();
        assert_eq!(value, FieldValue::from("Lobby guests"));

        let (_, value) = parse_assignment("note=a=b").unwrap();
        assert_eq!(value, FieldValue::from("a=b"));
    }

    #[test]
    fn assignment_requires_a_name() {
        assert!(matches!(
            parse_assignment("novalue"),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            parse_assignment("=3"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn lookup_file_shapes() {
        let dir = tempfile::tempdir().unwrap();

        let array = dir.path().join("sites.json");
        std::fs::write(&array, r#"[{"label":"HQ","value":"s1"}]"#).unwrap();
        assert_eq!(read_lookup_file(&array).unwrap().records.len(), 1);

        let object = dir.path().join("profiles.json");
        std::fs::write(
            &object,
            r#"{"records":[{"name":"Corp","id":"r1"}],"projection":{"labelKey":"name","valueKey":"id"}}"#,
        )
        .unwrap();
        let lookup = read_lookup_file(&object).unwrap();
        assert_eq!(lookup.projection.value_key, "id");

        let scalar = dir.path().join("bad.json");
        std::fs::write(&scalar, "42").unwrap();
        assert!(matches!(
            read_lookup_file(&scalar),
            Err(CliError::Validation { .. })
        ));
    }
}
