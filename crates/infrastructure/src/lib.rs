//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod openai_schema_generator;

pub use openai_schema_generator::OpenAiSchemaGenerator;
