//! Check results and their console rendering.
//!
//! The audit sequence returns an ordered list of [`CheckResult`]s; turning
//! them into glyph-prefixed lines is a presentation concern kept here so
//! tests can assert on the records directly.

use std::fmt;

const PASS_GLYPH: &str = "\u{2705}";
const FAIL_GLYPH: &str = "\u{274C}";

/// Outcome of a single expected-vs-actual check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// What was checked.
    pub description: String,
    /// The value the check required.
    pub expected: String,
    /// The value actually observed.
    pub actual: String,
    /// Whether expected and actual agreed.
    pub passed: bool,
}

impl CheckResult {
    /// Compares `expected` against `actual`; the check passes iff they are
    /// equal. The description never influences the outcome.
    pub fn compare(
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        let actual = actual.into();
        let passed = expected == actual;
        Self {
            description: description.into(),
            expected,
            actual,
            passed,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "{PASS_GLYPH} {}: {}", self.description, self.actual)
        } else {
            write!(
                f,
                "{FAIL_GLYPH} {}: {} (Expected: {})",
                self.description, self.actual, self.expected
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_iff_values_are_equal() {
        assert!(CheckResult::compare("subject", "acme.echo", "acme.echo").passed);
        assert!(!CheckResult::compare("subject", "acme.echo", "echo").passed);
    }

    #[test]
    fn description_does_not_influence_outcome() {
        let a = CheckResult::compare("first view", "x", "x");
        let b = CheckResult::compare("second view", "x", "x");
        assert_eq!(a.passed, b.passed);

        let c = CheckResult::compare("first view", "x", "y");
        let d = CheckResult::compare("second view", "x", "y");
        assert_eq!(c.passed, d.passed);
    }

    #[test]
    fn passing_check_renders_actual_only() {
        let check = CheckResult::compare("subject", "acme.echo", "acme.echo");
        assert_eq!(check.to_string(), "\u{2705} subject: acme.echo");
    }

    #[test]
    fn failing_check_renders_actual_and_expected() {
        let check = CheckResult::compare("subject", "acme.echo", "echo");
        assert_eq!(
            check.to_string(),
            "\u{274C} subject: echo (Expected: acme.echo)"
        );
    }
}
