use formwright_domain::{AssistInstruction, FormSchema};

/// Input payload for an AI-assisted schema edit.
#[derive(Debug, Clone, PartialEq)]
pub struct FormAssistRequest {
    /// Validated natural-language edit request.
    pub instruction: AssistInstruction,
    /// Schema the edit applies to.
    pub current_schema: FormSchema,
}

/// Outcome of an AI-assisted schema edit.
#[derive(Debug, Clone, PartialEq)]
pub struct FormAssistResult {
    /// Explanation returned by the generation capability.
    pub explanation: String,
    /// Rendered explanation, complexity summary and warnings.
    pub markdown: String,
    /// Candidate schema, not yet accepted by the user.
    pub schema: FormSchema,
    /// Capability warnings followed by safety issues.
    pub warnings: Vec<String>,
    /// Component count of the candidate schema.
    pub complexity: usize,
}

/// Structural report for a schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// Whether the document is a valid form schema.
    pub valid: bool,
    /// Validation problems, empty when valid.
    pub errors: Vec<String>,
    /// Component count at every depth.
    pub complexity: usize,
    /// Whether AI assistance would refuse this schema.
    pub exceeds_ai_limit: bool,
}

/// Limits advertised to clients before they request an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistLimits {
    /// Largest schema accepted for AI assistance.
    pub max_complexity: usize,
    /// Whether a generation capability is configured and enabled.
    pub ai_enabled: bool,
}
