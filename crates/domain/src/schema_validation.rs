use serde::Serialize;
use serde_json::Value;

use crate::form::{FormSchema, FormType};

/// Outcome of validating an untrusted form schema document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaValidation {
    /// Whether the document is an acceptable form schema.
    pub valid: bool,
    /// Human-readable problems, empty when valid.
    pub errors: Vec<String>,
    /// Decoded schema, present only when valid.
    pub data: Option<FormSchema>,
}

impl SchemaValidation {
    fn rejected(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            data: None,
        }
    }
}

/// Validates the structure of an untrusted form schema document.
///
/// Checks that the root is an object with a `components` array and an
/// accepted `type` tag when one is present, then decodes the component tree.
/// Component types are not checked against a catalog.
#[must_use]
pub fn validate_form_schema(candidate: &Value) -> SchemaValidation {
    let Some(root) = candidate.as_object() else {
        return SchemaValidation::rejected(vec![format!(
            "form schema must be a JSON object, got {}",
            json_kind(candidate)
        )]);
    };

    let mut errors = Vec::new();

    match root.get("components") {
        Some(Value::Array(_)) => {}
        Some(other) => errors.push(format!(
            "form schema 'components' must be an array, got {}",
            json_kind(other)
        )),
        None => errors.push("form schema must include a 'components' array".to_owned()),
    }

    match root.get("type") {
        None => {}
        Some(Value::String(form_type)) => {
            if form_type.parse::<FormType>().is_err() {
                errors.push(format!(
                    "unsupported form type '{form_type}', expected one of: {}",
                    FormType::ALL
                        .iter()
                        .map(FormType::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }
        Some(other) => errors.push(format!(
            "form schema 'type' must be a string, got {}",
            json_kind(other)
        )),
    }

    if !errors.is_empty() {
        return SchemaValidation::rejected(errors);
    }

    match serde_json::from_value::<FormSchema>(candidate.clone()) {
        Ok(schema) => SchemaValidation {
            valid: true,
            errors: Vec::new(),
            data: Some(schema),
        },
        Err(error) => SchemaValidation::rejected(vec![format!(
            "form schema contains a malformed component: {error}"
        )]),
    }
}

/// Counts components in a raw document without requiring it to decode.
///
/// Follows the same child sources as [`FormSchema::complexity`] and skips
/// anything that is not an object, so it also works on rejected documents.
#[must_use]
pub fn raw_component_complexity(candidate: &Value) -> usize {
    let mut count = 0;
    let mut pending = child_objects(candidate.get("components"));

    while let Some(component) = pending.pop() {
        count += 1;

        pending.extend(child_objects(component.get("components")));
        if let Some(Value::Array(columns)) = component.get("columns") {
            for column in columns {
                pending.extend(child_objects(column.get("components")));
            }
        }
        if let Some(Value::Array(rows)) = component.get("rows") {
            for cell in rows.iter().filter_map(Value::as_array).flatten() {
                pending.extend(child_objects(cell.get("components")));
            }
        }
    }

    count
}

fn child_objects(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().filter(|item| item.is_object()).collect(),
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
