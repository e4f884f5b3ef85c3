use formwright_core::{AppError, AppResult, NonEmptyString};

/// Longest instruction accepted for AI-assisted edits, in characters.
pub const ASSIST_INSTRUCTION_MAX_CHARS: usize = 1000;

/// Natural-language edit request for a form schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistInstruction(NonEmptyString);

impl AssistInstruction {
    /// Creates a validated instruction from user input.
    ///
    /// Surrounding whitespace is trimmed before the length check.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let length = trimmed.chars().count();
        if length > ASSIST_INSTRUCTION_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "message must be at most {ASSIST_INSTRUCTION_MAX_CHARS} characters, got {length}"
            )));
        }

        let message = NonEmptyString::new(trimmed).map_err(|_| {
            AppError::Validation("message must not be empty".to_owned())
        })?;
        Ok(Self(message))
    }

    /// Returns the instruction text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
