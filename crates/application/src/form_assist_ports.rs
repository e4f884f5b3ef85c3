mod generator;
mod inputs;

pub use generator::{GeneratedSchemaEdit, SchemaGenerationPrompt, SchemaGenerator};
pub use inputs::{AssistLimits, FormAssistRequest, FormAssistResult, SchemaReport};
