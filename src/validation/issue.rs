use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `Error` blocks a save, `Warning` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl ValidationIssue {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Error)
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Warning)
    }

    fn new(code: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity,
            field: None,
            context: Map::new(),
        }
    }

    pub fn on_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.field {
            Some(field) => write!(f, "{} [{}] {}: {}", prefix, self.code, field, self.message),
            None => write!(f, "{} [{}] {}", prefix, self.code, self.message),
        }
    }
}

/// Outcome of running every pass over a match. `ok` is true iff there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(issues: impl IntoIterator<Item = ValidationIssue>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(ValidationIssue::is_error);
        Self {
            ok: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        issues_as_strings(&self.errors)
    }

    pub fn warning_messages(&self) -> Vec<String> {
        issues_as_strings(&self.warnings)
    }

    pub fn summary(&self) -> String {
        if self.ok && self.warnings.is_empty() {
            "Data is valid.".to_string()
        } else if self.ok {
            format!("Data is valid with {} warning(s).", self.warnings.len())
        } else {
            format!(
                "{} error(s), {} warning(s).",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}

pub fn issues_as_strings(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}
