use formwright_application::FormAssistService;
use tokio_util::sync::CancellationToken;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub form_assist_service: FormAssistService,
    /// Cancelled when the server begins shutting down.
    pub shutdown: CancellationToken,
}
