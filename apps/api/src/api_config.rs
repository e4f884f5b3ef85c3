use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use formwright_application::{
    DEFAULT_GENERATION_TIMEOUT, DEFAULT_KEY_REMOVAL_TOLERANCE, DEFAULT_MAX_COMPLEXITY,
    DEFAULT_SAFETY_CEILING_MULTIPLIER, FormAssistPolicy, SafetyPolicy,
};
use formwright_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

/// Settings for the external generation capability and its safety limits.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_complexity: usize,
    pub safety_ceiling_multiplier: usize,
    pub key_removal_tolerance: f64,
    pub safety_policy: SafetyPolicy,
}

impl AiConfig {
    /// Builds the application policy from these settings.
    pub fn form_assist_policy(&self) -> Result<FormAssistPolicy, AppError> {
        Ok(FormAssistPolicy::new(
            self.max_complexity,
            self.safety_ceiling_multiplier,
            self.key_removal_tolerance,
        )?
        .with_safety_policy(self.safety_policy)
        .with_generation_timeout(self.timeout))
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub ai: AiConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed_or(&lookup, "API_PORT", 3001_u16)?;

        let enabled = lookup("AI_ENABLED").map_or(Ok(true), |value| parse_flag("AI_ENABLED", &value))?;
        let api_key = lookup("AI_API_KEY").filter(|value| !value.trim().is_empty());
        let base_url = lookup("AI_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_owned());
        let model = lookup("AI_MODEL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_owned());

        let timeout_seconds = parsed_or(
            &lookup,
            "AI_TIMEOUT_SECONDS",
            DEFAULT_GENERATION_TIMEOUT.as_secs(),
        )?;
        if timeout_seconds == 0 {
            return Err(AppError::Validation(
                "AI_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let max_complexity = parsed_or(&lookup, "AI_MAX_COMPLEXITY", DEFAULT_MAX_COMPLEXITY)?;
        let safety_ceiling_multiplier = parsed_or(
            &lookup,
            "AI_SAFETY_CEILING_MULTIPLIER",
            DEFAULT_SAFETY_CEILING_MULTIPLIER,
        )?;
        let key_removal_tolerance = parsed_or(
            &lookup,
            "AI_KEY_REMOVAL_TOLERANCE",
            DEFAULT_KEY_REMOVAL_TOLERANCE,
        )?;
        let safety_policy = lookup("AI_SAFETY_POLICY")
            .map(|value| SafetyPolicy::from_str(value.trim()))
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            frontend_url,
            api_host,
            api_port,
            ai: AiConfig {
                enabled,
                api_key,
                base_url,
                model,
                timeout: Duration::from_secs(timeout_seconds),
                max_complexity,
                safety_ceiling_multiplier,
                key_removal_tolerance,
                safety_policy,
            },
        };

        // Reject inconsistent limits at startup rather than on first request.
        config.ai.form_assist_policy()?;

        Ok(config)
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parsed_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{value}'"
        ))),
    }
}
