use formwright_core::{AppError, AppResult};
use formwright_domain::FormComponent;

/// Builds the instruction set every generation call runs under.
#[must_use]
pub fn build_system_prompt(max_complexity: usize) -> String {
    format!(
        "You edit form schemas made of nested components (fields, panels, columns, tables).\n\
         Rules:\n\
         1. Preserve every existing component, including its key and settings, unless the user explicitly asks to remove or change it.\n\
         2. Give every new component a unique, descriptive camelCase key that no other component in the form uses.\n\
         3. Keep the whole form at or below {max_complexity} components, counting components nested inside panels, columns and table cells.\n\
         4. Reply with a single JSON object and nothing else, shaped as \
         {{\"explanation\": string, \"components\": [component, ...], \"warnings\": [string, ...]}}. \
         \"components\" is the complete updated list of root components; \"warnings\" may be empty."
    )
}

/// Builds the user turn: current components followed by the request.
pub fn build_user_prompt(components: &[FormComponent], message: &str) -> AppResult<String> {
    let components = serde_json::to_string_pretty(components).map_err(|error| {
        AppError::Internal(format!("failed to serialize form components: {error}"))
    })?;

    Ok(format!(
        "Current form components:\n```json\n{components}\n```\n\nRequested change: {message}"
    ))
}
