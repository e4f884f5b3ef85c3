//! Form schema model, traversal and structural validation.

#![forbid(unsafe_code)]

mod assist;
mod form;
mod schema_validation;
mod traversal;

pub use assist::{ASSIST_INSTRUCTION_MAX_CHARS, AssistInstruction};
pub use form::{
    ColumnLayout, ComponentConditional, ComponentValidation, FormCell, FormColumn, FormComponent,
    FormSchema, FormType, RowLayout,
};
pub use schema_validation::{SchemaValidation, raw_component_complexity, validate_form_schema};
pub use traversal::{component_complexity, component_keys, for_each_component};
