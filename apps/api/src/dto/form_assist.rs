use formwright_application::{AssistLimits, SchemaReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming AI form assist payload.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/form-assist-request.ts"
)]
pub struct FormAssistRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub current_schema: Value,
}

/// AI form assist result payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/form-assist-response.ts"
)]
pub struct FormAssistResponse {
    pub markdown: String,
    #[ts(type = "Record<string, unknown>")]
    pub schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub warnings: Option<Vec<String>>,
}

/// Incoming schema validation payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/validate-schema-request.ts"
)]
pub struct ValidateSchemaRequest {
    #[serde(default)]
    #[ts(type = "unknown")]
    pub schema: Value,
}

/// Schema validation result payload.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/validate-schema-response.ts"
)]
pub struct ValidateSchemaResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub errors: Option<Vec<String>>,
    pub complexity: usize,
    #[serde(rename = "exceedsAILimit")]
    pub exceeds_ai_limit: bool,
}

impl From<SchemaReport> for ValidateSchemaResponse {
    fn from(value: SchemaReport) -> Self {
        Self {
            valid: value.valid,
            errors: (!value.errors.is_empty()).then_some(value.errors),
            complexity: value.complexity,
            exceeds_ai_limit: value.exceeds_ai_limit,
        }
    }
}

/// Advertised AI assistance limits.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/limits-response.ts"
)]
pub struct LimitsResponse {
    pub max_complexity: usize,
    pub ai_enabled: bool,
}

impl From<AssistLimits> for LimitsResponse {
    fn from(value: AssistLimits) -> Self {
        Self {
            max_complexity: value.max_complexity,
            ai_enabled: value.ai_enabled,
        }
    }
}
