use std::str::FromStr;
use std::time::Duration;

use formwright_core::{AppError, AppResult};

/// Component count above which AI assistance refuses a schema.
pub const DEFAULT_MAX_COMPLEXITY: usize = 50;
/// Safety ceiling as a multiple of the complexity limit.
pub const DEFAULT_SAFETY_CEILING_MULTIPLIER: usize = 2;
/// Share of existing keys an edit may remove before it is flagged.
pub const DEFAULT_KEY_REMOVAL_TOLERANCE: f64 = 0.5;
/// Time budget for one generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// How a candidate that fails the safety checks is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SafetyPolicy {
    /// Return the candidate with every safety issue attached as a warning.
    #[default]
    FailOpen,
    /// Reject the candidate with the safety issues.
    FailClosed,
}

impl SafetyPolicy {
    /// Returns stable configuration value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailOpen => "fail_open",
            Self::FailClosed => "fail_closed",
        }
    }
}

impl FromStr for SafetyPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fail_open" => Ok(Self::FailOpen),
            "fail_closed" => Ok(Self::FailClosed),
            _ => Err(AppError::Validation(format!(
                "unknown safety policy '{value}', expected 'fail_open' or 'fail_closed'"
            ))),
        }
    }
}

/// Tunable limits for AI-assisted schema edits.
#[derive(Debug, Clone, PartialEq)]
pub struct FormAssistPolicy {
    max_complexity: usize,
    safety_ceiling_multiplier: usize,
    key_removal_tolerance: f64,
    safety_policy: SafetyPolicy,
    generation_timeout: Duration,
}

impl FormAssistPolicy {
    /// Creates a validated policy with the default safety policy and timeout.
    pub fn new(
        max_complexity: usize,
        safety_ceiling_multiplier: usize,
        key_removal_tolerance: f64,
    ) -> AppResult<Self> {
        if max_complexity == 0 {
            return Err(AppError::Validation(
                "max complexity must be greater than zero".to_owned(),
            ));
        }

        if safety_ceiling_multiplier == 0 {
            return Err(AppError::Validation(
                "safety ceiling multiplier must be greater than zero".to_owned(),
            ));
        }

        if !(0.0..=1.0).contains(&key_removal_tolerance) {
            return Err(AppError::Validation(format!(
                "key removal tolerance must be between 0 and 1, got {key_removal_tolerance}"
            )));
        }

        Ok(Self {
            max_complexity,
            safety_ceiling_multiplier,
            key_removal_tolerance,
            safety_policy: SafetyPolicy::default(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        })
    }

    /// Sets how failed safety checks are handled.
    #[must_use]
    pub fn with_safety_policy(mut self, safety_policy: SafetyPolicy) -> Self {
        self.safety_policy = safety_policy;
        self
    }

    /// Sets the time budget for one generation call.
    #[must_use]
    pub fn with_generation_timeout(mut self, generation_timeout: Duration) -> Self {
        self.generation_timeout = generation_timeout;
        self
    }

    /// Returns the soft complexity limit.
    #[must_use]
    pub fn max_complexity(&self) -> usize {
        self.max_complexity
    }

    /// Returns the hard ceiling a candidate schema may reach.
    #[must_use]
    pub fn safety_ceiling(&self) -> usize {
        self.max_complexity
            .saturating_mul(self.safety_ceiling_multiplier)
    }

    /// Returns the tolerated share of removed keys.
    #[must_use]
    pub fn key_removal_tolerance(&self) -> f64 {
        self.key_removal_tolerance
    }

    /// Returns the safety policy.
    #[must_use]
    pub fn safety_policy(&self) -> SafetyPolicy {
        self.safety_policy
    }

    /// Returns the generation time budget.
    #[must_use]
    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }
}

impl Default for FormAssistPolicy {
    fn default() -> Self {
        Self {
            max_complexity: DEFAULT_MAX_COMPLEXITY,
            safety_ceiling_multiplier: DEFAULT_SAFETY_CEILING_MULTIPLIER,
            key_removal_tolerance: DEFAULT_KEY_REMOVAL_TOLERANCE,
            safety_policy: SafetyPolicy::default(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}
