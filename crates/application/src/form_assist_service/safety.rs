use formwright_domain::{FormSchema, validate_form_schema};
use serde::Serialize;

use super::config::FormAssistPolicy;

/// Result of comparing a candidate schema against the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyVerdict {
    /// Whether no issue was found.
    pub valid: bool,
    /// Every issue found, in check order.
    pub issues: Vec<String>,
}

/// Structural and quantitative safety net for candidate schemas.
///
/// Knows nothing about why a change was requested; it only flags invalid
/// structure, excessive growth, wholesale field removal and duplicate keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyChecker {
    ceiling: usize,
    key_removal_tolerance: f64,
}

impl SafetyChecker {
    /// Creates a checker from the configured policy.
    #[must_use]
    pub fn new(policy: &FormAssistPolicy) -> Self {
        Self {
            ceiling: policy.safety_ceiling(),
            key_removal_tolerance: policy.key_removal_tolerance(),
        }
    }

    /// Runs every check and collects all issues found.
    #[must_use]
    pub fn check(&self, original: &FormSchema, candidate: &FormSchema) -> SafetyVerdict {
        let mut issues = Vec::new();

        match candidate.to_value() {
            Ok(document) => issues.extend(validate_form_schema(&document).errors),
            Err(error) => issues.push(error.to_string()),
        }

        let complexity = candidate.complexity();
        if complexity > self.ceiling {
            issues.push(format!(
                "updated form has {complexity} components, exceeding the safety ceiling of {}",
                self.ceiling
            ));
        }

        let original_keys = original.key_set();
        let candidate_keys = candidate.key_set();
        let removed_keys = original_keys
            .difference(&candidate_keys)
            .copied()
            .collect::<Vec<_>>();
        if self.removal_exceeds_tolerance(removed_keys.len(), original_keys.len()) {
            issues.push(format!(
                "updated form removes {} of {} existing fields ({}); submissions stored under these keys may be lost",
                removed_keys.len(),
                original_keys.len(),
                removed_keys.join(", ")
            ));
        }

        let duplicates = candidate.duplicate_keys();
        if !duplicates.is_empty() {
            issues.push(format!(
                "updated form reuses component keys: {}",
                duplicates.join(", ")
            ));
        }

        SafetyVerdict {
            valid: issues.is_empty(),
            issues,
        }
    }

    fn removal_exceeds_tolerance(&self, removed: usize, original: usize) -> bool {
        if removed == 0 || original == 0 {
            return false;
        }

        // Ratio rather than product: 3 of 10 at 0.3 must compare equal.
        removed as f64 / original as f64 >= self.key_removal_tolerance
    }
}
