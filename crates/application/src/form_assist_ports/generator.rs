use async_trait::async_trait;
use formwright_core::{AppError, AppResult};
use formwright_domain::FormComponent;
use serde::Deserialize;

/// Prompt handed to the generation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaGenerationPrompt {
    /// Instructions governing how the schema may be changed.
    pub system_prompt: String,
    /// Current components and the user's request.
    pub user_prompt: String,
}

/// Structured reply from the generation capability.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedSchemaEdit {
    /// Natural-language summary of the change.
    #[serde(default)]
    pub explanation: String,
    /// Full replacement list of root components.
    pub components: Vec<FormComponent>,
    /// Caveats the capability wants surfaced to the user.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl GeneratedSchemaEdit {
    /// Parses a model reply, tolerating a Markdown code fence around the JSON.
    pub fn from_model_reply(reply: &str) -> AppResult<Self> {
        let body = strip_code_fence(reply.trim());
        if body.is_empty() {
            return Err(AppError::Generation(
                "AI reply did not contain a form update".to_owned(),
            ));
        }

        serde_json::from_str::<Self>(body).map_err(|error| {
            AppError::Generation(format!("AI reply was not a valid form update: {error}"))
        })
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let Some(fenced) = reply.strip_prefix("```") else {
        return reply;
    };

    // Drop the info string ("json") on the opening fence line, which may run
    // straight into the body on a single-line reply.
    let body = match fenced.split_once('\n') {
        Some((_, rest)) => rest,
        None => fenced.trim_start_matches(|character: char| character.is_ascii_alphanumeric()),
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Port for the external natural-language schema generation capability.
#[async_trait]
pub trait SchemaGenerator: Send + Sync {
    /// Returns whether the capability is configured and enabled.
    fn is_available(&self) -> bool;

    /// Produces an updated component list for one prompt.
    async fn generate(&self, prompt: SchemaGenerationPrompt) -> AppResult<GeneratedSchemaEdit>;
}

#[cfg(test)]
mod tests {
    use formwright_core::AppError;

    use super::GeneratedSchemaEdit;

    #[test]
    fn parses_plain_json_reply() {
        let edit = GeneratedSchemaEdit::from_model_reply(
            r#"{"explanation": "Added email.", "components": [{"type": "email", "key": "email"}]}"#,
        );
        assert!(edit.is_ok());
        let edit = edit.unwrap_or_else(|_| unreachable!());
        assert_eq!(edit.explanation, "Added email.");
        assert_eq!(edit.components.len(), 1);
        assert!(edit.warnings.is_empty());
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n{\"components\": [], \"warnings\": [\"Removed everything\"]}\n```\n";
        let edit = GeneratedSchemaEdit::from_model_reply(reply).unwrap_or_else(|_| unreachable!());
        assert!(edit.components.is_empty());
        assert_eq!(edit.warnings, vec!["Removed everything".to_owned()]);
        assert!(edit.explanation.is_empty());
    }

    #[test]
    fn parses_single_line_fenced_reply() {
        let reply = r#"```json{"explanation": "Added email.", "components": [{"type": "email", "key": "email"}]}```"#;
        let edit = GeneratedSchemaEdit::from_model_reply(reply).unwrap_or_else(|_| unreachable!());
        assert_eq!(edit.explanation, "Added email.");
        assert_eq!(edit.components.len(), 1);

        let bare = GeneratedSchemaEdit::from_model_reply(r#"```{"components": []}```"#);
        assert!(bare.is_ok());
    }

    #[test]
    fn missing_components_is_a_generation_failure() {
        let result = GeneratedSchemaEdit::from_model_reply(r#"{"explanation": "done"}"#);
        assert!(matches!(result, Err(AppError::Generation(_))));
    }

    #[test]
    fn prose_reply_is_a_generation_failure() {
        let result = GeneratedSchemaEdit::from_model_reply("Sure! I added the field.");
        assert!(matches!(result, Err(AppError::Generation(_))));
        assert!(matches!(
            GeneratedSchemaEdit::from_model_reply("   "),
            Err(AppError::Generation(_))
        ));
    }
}
