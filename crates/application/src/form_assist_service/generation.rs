use std::sync::Arc;

use formwright_core::{AppError, AppResult};
use formwright_domain::validate_form_schema;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::markdown::format_assist_markdown;
use super::prompt::{build_system_prompt, build_user_prompt};
use super::{FormAssistService, SafetyPolicy};
use crate::form_assist_ports::{
    FormAssistRequest, FormAssistResult, GeneratedSchemaEdit, SchemaGenerationPrompt,
    SchemaGenerator,
};

impl FormAssistService {
    /// Produces a candidate schema for a natural-language edit request.
    ///
    /// Rejects oversized schemas before contacting the generation
    /// capability. The call to the capability is bounded by the policy
    /// timeout and by `cancellation`; neither returns a partial result.
    pub async fn generate(
        &self,
        request: FormAssistRequest,
        cancellation: &CancellationToken,
    ) -> AppResult<FormAssistResult> {
        let FormAssistRequest {
            instruction,
            current_schema,
        } = request;

        let current_complexity = current_schema.complexity();
        let limit = self.policy.max_complexity();
        if current_complexity > limit {
            warn!(
                complexity = current_complexity,
                limit, "form assist rejected oversized schema"
            );
            return Err(AppError::ComplexityExceeded {
                actual: current_complexity,
                limit,
            });
        }

        let generator = self.available_generator().cloned().ok_or_else(|| {
            AppError::Unavailable(
                "AI assistance is not configured; contact your administrator".to_owned(),
            )
        })?;

        let prompt = SchemaGenerationPrompt {
            system_prompt: build_system_prompt(limit),
            user_prompt: build_user_prompt(current_schema.components(), instruction.as_str())?,
        };

        info!(complexity = current_complexity, "form assist invoking generator");
        let edit = self.invoke_generator(generator, prompt, cancellation).await?;

        let candidate = current_schema.with_components(edit.components);
        let structure = validate_form_schema(&candidate.to_value()?);
        if !structure.valid {
            warn!(errors = ?structure.errors, "form assist produced a structurally invalid schema");
            return Err(AppError::SafetyCheckFailed(structure.errors));
        }

        let verdict = self.safety_checker().check(&current_schema, &candidate);
        let mut warnings = edit.warnings;
        if !verdict.valid {
            warn!(
                issues = ?verdict.issues,
                policy = self.policy.safety_policy().as_str(),
                "form assist candidate failed safety checks"
            );
            match self.policy.safety_policy() {
                SafetyPolicy::FailClosed => {
                    return Err(AppError::SafetyCheckFailed(verdict.issues));
                }
                SafetyPolicy::FailOpen => warnings.extend(verdict.issues),
            }
        }

        let complexity = candidate.complexity();
        let markdown = format_assist_markdown(&edit.explanation, complexity, &warnings);
        info!(
            previous_complexity = current_complexity,
            complexity,
            warnings = warnings.len(),
            "form assist produced candidate schema"
        );

        Ok(FormAssistResult {
            explanation: edit.explanation,
            markdown,
            schema: candidate,
            warnings,
            complexity,
        })
    }

    async fn invoke_generator(
        &self,
        generator: Arc<dyn SchemaGenerator>,
        prompt: SchemaGenerationPrompt,
        cancellation: &CancellationToken,
    ) -> AppResult<GeneratedSchemaEdit> {
        let timeout = self.policy.generation_timeout();

        tokio::select! {
            biased;
            () = cancellation.cancelled() => {
                warn!("form assist generation cancelled");
                Err(AppError::Cancelled("form assist request was cancelled".to_owned()))
            }
            outcome = tokio::time::timeout(timeout, generator.generate(prompt)) => match outcome {
                Ok(Ok(edit)) => Ok(edit),
                Ok(Err(AppError::Generation(message))) => Err(AppError::Generation(message)),
                Ok(Err(error)) => Err(AppError::Generation(error.to_string())),
                Err(_) => {
                    warn!(
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "form assist generation timed out"
                    );
                    Err(AppError::Timeout(format!(
                        "AI assistance did not respond within {} seconds",
                        timeout.as_secs_f64()
                    )))
                }
            },
        }
    }
}
