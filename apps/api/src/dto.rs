mod common;
mod form_assist;

pub use common::HealthResponse;
pub use form_assist::{
    FormAssistRequest, FormAssistResponse, LimitsResponse, ValidateSchemaRequest,
    ValidateSchemaResponse,
};
