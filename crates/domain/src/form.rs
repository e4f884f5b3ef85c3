use std::str::FromStr;

use formwright_core::{AppError, AppResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Root form document types accepted by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    /// Single-page form.
    Form,
    /// Multi-step form.
    Wizard,
    /// Form-shaped resource document.
    Resource,
}

impl FormType {
    /// Every accepted type tag, in display order.
    pub const ALL: [Self; 3] = [Self::Form, Self::Wizard, Self::Resource];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Wizard => "wizard",
            Self::Resource => "resource",
        }
    }
}

impl FromStr for FormType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "form" => Ok(Self::Form),
            "wizard" => Ok(Self::Wizard),
            "resource" => Ok(Self::Resource),
            _ => Err(AppError::Validation(format!("unknown form type '{value}'"))),
        }
    }
}

/// Field validation rules carried on a component.
///
/// Rules are kept as the raw object so builder-specific entries survive an
/// edit; the accessors expose the common ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentValidation(Map<String, Value>);

impl ComponentValidation {
    /// Returns whether a value is required.
    #[must_use]
    pub fn required(&self) -> bool {
        self.0.get("required").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns the regular expression the value must match.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.0
            .get("pattern")
            .and_then(Value::as_str)
            .filter(|pattern| !pattern.is_empty())
    }

    /// Returns the minimum text length.
    #[must_use]
    pub fn min_length(&self) -> Option<u64> {
        self.0.get("minLength").and_then(Value::as_u64)
    }

    /// Returns the maximum text length.
    #[must_use]
    pub fn max_length(&self) -> Option<u64> {
        self.0.get("maxLength").and_then(Value::as_u64)
    }

    /// Returns the minimum numeric value.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.0.get("min").and_then(Value::as_f64)
    }

    /// Returns the maximum numeric value.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.0.get("max").and_then(Value::as_f64)
    }
}

/// Visibility rule referencing another component key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentConditional(Map<String, Value>);

impl ComponentConditional {
    /// Returns the key of the component this rule watches.
    #[must_use]
    pub fn when(&self) -> Option<&str> {
        self.0
            .get("when")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
    }

    /// Returns the value the watched component must equal.
    #[must_use]
    pub fn equals(&self) -> Option<&Value> {
        self.0.get("eq")
    }

    /// Returns whether the component is shown when the rule matches.
    ///
    /// Builders store this flag as either a boolean or a string.
    #[must_use]
    pub fn show(&self) -> Option<bool> {
        match self.0.get("show")? {
            Value::Bool(show) => Some(*show),
            Value::String(show) => match show.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One column of a column layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormColumn {
    #[serde(default)]
    components: Vec<FormComponent>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FormColumn {
    /// Creates a column holding the given components.
    #[must_use]
    pub fn new(components: Vec<FormComponent>) -> Self {
        Self {
            components,
            extra: Map::new(),
        }
    }

    /// Returns components placed in this column.
    #[must_use]
    pub fn components(&self) -> &[FormComponent] {
        &self.components
    }
}

/// One cell of a row/cell grid layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormCell {
    #[serde(default)]
    components: Vec<FormComponent>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FormCell {
    /// Creates a cell holding the given components.
    #[must_use]
    pub fn new(components: Vec<FormComponent>) -> Self {
        Self {
            components,
            extra: Map::new(),
        }
    }

    /// Returns components placed in this cell.
    #[must_use]
    pub fn components(&self) -> &[FormComponent] {
        &self.components
    }
}

/// `columns` property of a component.
///
/// An array must decode as column objects; any other value under that name
/// is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnLayout {
    /// Column objects owning child components.
    Columns(Vec<FormColumn>),
    /// Unrelated value stored under the same property name.
    Opaque(Value),
}

/// `rows` property of a component.
///
/// Tables carry a grid of cells; a text area stores a plain row count.
/// An array must decode as a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowLayout {
    /// Rows of cells owning child components.
    Grid(Vec<Vec<FormCell>>),
    /// Unrelated value stored under the same property name.
    Opaque(Value),
}

impl<'de> Deserialize<'de> for ColumnLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            items @ Value::Array(_) => serde_json::from_value(items)
                .map(Self::Columns)
                .map_err(|error| D::Error::custom(format!("invalid 'columns' entry: {error}"))),
            other => Ok(Self::Opaque(other)),
        }
    }
}

impl<'de> Deserialize<'de> for RowLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            rows @ Value::Array(_) => serde_json::from_value(rows)
                .map(Self::Grid)
                .map_err(|error| D::Error::custom(format!("invalid 'rows' cell: {error}"))),
            other => Ok(Self::Opaque(other)),
        }
    }
}

/// Node of the form component tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormComponent {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validate: Option<ComponentValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conditional: Option<ComponentConditional>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<FormComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns: Option<ColumnLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows: Option<RowLayout>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FormComponent {
    /// Creates a component with a type tag and key.
    #[must_use]
    pub fn new(component_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks whether the component collects a value.
    #[must_use]
    pub fn with_input(mut self, input: bool) -> Self {
        self.input = Some(input);
        self
    }

    /// Replaces the directly nested components.
    #[must_use]
    pub fn with_components(mut self, components: Vec<FormComponent>) -> Self {
        self.components = components;
        self
    }

    /// Replaces the column layout.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<FormColumn>) -> Self {
        self.columns = Some(ColumnLayout::Columns(columns));
        self
    }

    /// Replaces the row/cell grid.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Vec<FormCell>>) -> Self {
        self.rows = Some(RowLayout::Grid(rows));
        self
    }

    /// Returns the component type tag.
    #[must_use]
    pub fn component_type(&self) -> &str {
        self.component_type.as_str()
    }

    /// Returns the component key, if one is set.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns whether the component collects a value.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.input.unwrap_or(false)
    }

    /// Returns validation rules.
    #[must_use]
    pub fn validate(&self) -> Option<&ComponentValidation> {
        self.validate.as_ref()
    }

    /// Returns the visibility rule.
    #[must_use]
    pub fn conditional(&self) -> Option<&ComponentConditional> {
        self.conditional.as_ref()
    }

    /// Returns directly nested components.
    #[must_use]
    pub fn components(&self) -> &[FormComponent] {
        &self.components
    }

    /// Returns an arbitrary passthrough property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Yields every child sequence this component owns: its direct
    /// components, then each column, then each grid cell row by row.
    pub fn child_sequences(&self) -> impl Iterator<Item = &[FormComponent]> + '_ {
        let columns: &[FormColumn] = match &self.columns {
            Some(ColumnLayout::Columns(columns)) => columns,
            _ => &[],
        };
        let rows: &[Vec<FormCell>] = match &self.rows {
            Some(RowLayout::Grid(rows)) => rows,
            _ => &[],
        };

        std::iter::once(self.components.as_slice())
            .chain(columns.iter().map(FormColumn::components))
            .chain(rows.iter().flatten().map(FormCell::components))
    }
}

/// Root form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    form_type: Option<FormType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    components: Vec<FormComponent>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FormSchema {
    /// Creates a plain form with the given root components.
    #[must_use]
    pub fn new(components: Vec<FormComponent>) -> Self {
        Self {
            title: None,
            name: None,
            form_type: Some(FormType::Form),
            display: Some("form".to_owned()),
            components,
            extra: Map::new(),
        }
    }

    /// Sets the form title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns a copy with the root components replaced and every other
    /// root-level property preserved.
    #[must_use]
    pub fn with_components(&self, components: Vec<FormComponent>) -> Self {
        Self {
            components,
            ..self.clone()
        }
    }

    /// Returns the form title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the machine name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the document type tag.
    #[must_use]
    pub fn form_type(&self) -> Option<FormType> {
        self.form_type
    }

    /// Returns the display mode.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Returns root-level components.
    #[must_use]
    pub fn components(&self) -> &[FormComponent] {
        &self.components
    }

    /// Serializes the schema into a JSON document.
    pub fn to_value(&self) -> AppResult<Value> {
        serde_json::to_value(self).map_err(|error| {
            AppError::Internal(format!("failed to serialize form schema: {error}"))
        })
    }
}
