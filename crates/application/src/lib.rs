//! Application services and ports.

#![forbid(unsafe_code)]

mod form_assist_ports;
mod form_assist_service;

pub use form_assist_ports::{
    AssistLimits, FormAssistRequest, FormAssistResult, GeneratedSchemaEdit, SchemaGenerationPrompt,
    SchemaGenerator, SchemaReport,
};
pub use form_assist_service::{
    DEFAULT_GENERATION_TIMEOUT, DEFAULT_KEY_REMOVAL_TOLERANCE, DEFAULT_MAX_COMPLEXITY,
    DEFAULT_SAFETY_CEILING_MULTIPLIER, FormAssistPolicy, FormAssistService, SafetyChecker,
    SafetyPolicy, SafetyVerdict, build_system_prompt, build_user_prompt, format_assist_markdown,
};
