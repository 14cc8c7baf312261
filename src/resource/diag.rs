//! Diagnostics returned to the orchestrator

use crate::pam::ApiError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_path: Option<String>,
}

/// Ordered list of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One error diagnostic describing `err`
    pub fn from_error(err: &ApiError) -> Self {
        let summary = match err {
            ApiError::NotSupported(_) => "Operation not supported by the tenant",
            ApiError::Validation(_) => "Invalid configuration",
            ApiError::NotFound => "Remote object not found",
            _ => "PAM API request failed",
        };
        let mut diags = Self::new();
        diags.error(summary, err.to_string());
        diags
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute_path: None,
        });
    }

    pub fn warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute_path: None,
        });
    }

    /// Error pinned to one attribute
    pub fn attribute_error(&mut self, path: impl Into<String>, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute_path: Some(path.into()),
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_supported_has_distinct_summary() {
        let diags = Diagnostics::from_error(&ApiError::NotSupported("IM".into()));
        assert!(diags.has_error());
        let first = diags.iter().next().unwrap();
        assert_eq!(first.summary, "Operation not supported by the tenant");
        assert!(first.detail.contains("IM"));
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut diags = Diagnostics::new();
        diags.warning("stale", "");
        assert!(!diags.has_error());
        diags.attribute_error("associations", "unknown environment", "dev");
        assert!(diags.has_error());
        assert_eq!(diags.len(), 2);
    }
}
