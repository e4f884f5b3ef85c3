use std::sync::Arc;

use formwright_domain::{FormSchema, raw_component_complexity, validate_form_schema};
use serde_json::Value;

use crate::form_assist_ports::{AssistLimits, SchemaGenerator, SchemaReport};

mod config;
mod generation;
mod markdown;
mod prompt;
mod safety;

pub use config::{
    DEFAULT_GENERATION_TIMEOUT, DEFAULT_KEY_REMOVAL_TOLERANCE, DEFAULT_MAX_COMPLEXITY,
    DEFAULT_SAFETY_CEILING_MULTIPLIER, FormAssistPolicy, SafetyPolicy,
};
pub use markdown::format_assist_markdown;
pub use prompt::{build_system_prompt, build_user_prompt};
pub use safety::{SafetyChecker, SafetyVerdict};

/// AI-assisted form schema editing service.
#[derive(Clone)]
pub struct FormAssistService {
    policy: FormAssistPolicy,
    generator: Option<Arc<dyn SchemaGenerator>>,
}

impl FormAssistService {
    /// Creates a form assist service without a generation capability.
    #[must_use]
    pub fn new(policy: FormAssistPolicy) -> Self {
        Self {
            policy,
            generator: None,
        }
    }

    /// Adds the external generation capability.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn SchemaGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Returns the configured policy.
    #[must_use]
    pub fn policy(&self) -> &FormAssistPolicy {
        &self.policy
    }

    /// Returns a safety checker configured from the policy.
    #[must_use]
    pub fn safety_checker(&self) -> SafetyChecker {
        SafetyChecker::new(&self.policy)
    }

    /// Returns the advertised limits.
    #[must_use]
    pub fn limits(&self) -> AssistLimits {
        AssistLimits {
            max_complexity: self.policy.max_complexity(),
            ai_enabled: self.available_generator().is_some(),
        }
    }

    /// Validates a schema document and reports its complexity.
    #[must_use]
    pub fn validate_schema(&self, document: &Value) -> SchemaReport {
        let validation = validate_form_schema(document);
        let complexity = validation.data.as_ref().map_or_else(
            || raw_component_complexity(document),
            FormSchema::complexity,
        );

        SchemaReport {
            valid: validation.valid,
            errors: validation.errors,
            complexity,
            exceeds_ai_limit: complexity > self.policy.max_complexity(),
        }
    }

    fn available_generator(&self) -> Option<&Arc<dyn SchemaGenerator>> {
        self.generator
            .as_ref()
            .filter(|generator| generator.is_available())
    }
}

#[cfg(test)]
mod tests;
