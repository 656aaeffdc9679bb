use serde::Serialize;

/// Accumulated rule violations for one submission.
///
/// Rules never short-circuit each other, so a caller sees every problem in a
/// single round trip. `valid` is kept in step with `errors` by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let mut result = Self::success();
        result.add_error(error);
        result
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.valid = false;
        self.errors.push(error.into());
    }

    /// Records `message` when `field` is absent or whitespace only.
    pub fn require(&mut self, field: Option<&str>, message: &str) {
        if is_blank(field) {
            self.add_error(message);
        }
    }

    /// Records `message` when a tri-state flag was never answered.
    pub fn require_flag(&mut self, flag: Option<bool>, message: &str) {
        if flag.is_none() {
            self.add_error(message);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

/// Only checks for an `@`.
pub(crate) fn looks_like_email(value: &str) -> bool {
    value.contains('@')
}
