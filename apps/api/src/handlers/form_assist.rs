use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use formwright_application::FormAssistRequest as AssistInput;
use formwright_core::AppError;
use formwright_domain::{AssistInstruction, SchemaValidation, validate_form_schema};
use tracing::info;

use crate::dto::{
    FormAssistRequest, FormAssistResponse, LimitsResponse, ValidateSchemaRequest,
    ValidateSchemaResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn form_assist_handler(
    State(state): State<AppState>,
    payload: Result<Json<FormAssistRequest>, JsonRejection>,
) -> ApiResult<Json<FormAssistResponse>> {
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let instruction = AssistInstruction::new(payload.message)?;
    let SchemaValidation { data, errors, .. } = validate_form_schema(&payload.current_schema);
    let current_schema = data.ok_or_else(|| {
        AppError::Validation(format!("current schema is invalid: {}", errors.join("; ")))
    })?;

    let cancellation = state.shutdown.child_token();
    let result = state
        .form_assist_service
        .generate(
            AssistInput {
                instruction,
                current_schema,
            },
            &cancellation,
        )
        .await?;

    info!(
        complexity = result.complexity,
        warnings = result.warnings.len(),
        "form assist request completed"
    );

    Ok(Json(FormAssistResponse {
        markdown: result.markdown,
        schema: result.schema.to_value()?,
        warnings: (!result.warnings.is_empty()).then_some(result.warnings),
    }))
}

pub async fn validate_schema_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateSchemaRequest>, JsonRejection>,
) -> ApiResult<Json<ValidateSchemaResponse>> {
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    Ok(Json(
        state.form_assist_service.validate_schema(&payload.schema).into(),
    ))
}

pub async fn limits_handler(State(state): State<AppState>) -> Json<LimitsResponse> {
    Json(state.form_assist_service.limits().into())
}
